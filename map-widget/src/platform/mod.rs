//! Access to the host environment: the document the widget is attached to, deferred execution and
//! the mapping engine.
//!
//! The widget itself never touches a concrete DOM. [`headless`] provides an in-memory
//! implementation used on native targets and in tests, `web` (on `wasm32` only) implements the
//! same traits on top of `web-sys`.

use std::time::Duration;

use map_widget_types::cartesian::Size;

use crate::error::WidgetError;
use crate::surface::{MapSurface, MapSurfaceBuilder};

pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// One-shot unit of work scheduled for later execution.
pub type Task = Box<dyn FnOnce()>;

/// Selector matching elements that can receive keyboard focus.
pub const FOCUSABLE_SELECTOR: &str = "button, [href], input, select, textarea, [tabindex]:not([tabindex=\"-1\"])";

/// Element of the host document.
///
/// Handles are cheap to clone and refer to the same underlying element. Equal handles refer to
/// the same element.
pub trait HostElement: Clone + PartialEq + 'static {
    /// Id of the element.
    fn id(&self) -> Option<String>;
    /// Whether the element is attached to the document.
    fn is_connected(&self) -> bool;
    /// Value of the attribute.
    fn attribute(&self, name: &str) -> Option<String>;
    /// Sets the value of the attribute.
    fn set_attribute(&self, name: &str, value: &str);
    /// Whether the element has the CSS class.
    fn has_class(&self, class: &str) -> bool;
    /// Adds the CSS class. Does nothing if the class is already present.
    fn add_class(&self, class: &str);
    /// Removes the CSS class. Does nothing if the class is absent.
    fn remove_class(&self, class: &str);
    /// Replaces the text content of the element.
    fn set_text(&self, text: &str);
    /// Value of an inline style property.
    fn style(&self, property: &str) -> Option<String>;
    /// Sets (`Some`) or removes (`None`) an inline style property.
    fn set_style(&self, property: &str, value: Option<&str>);
    /// Size of the element's content box in pixels.
    fn client_size(&self) -> Size;
    /// Moves keyboard focus to the element.
    fn focus(&self);
    /// First descendant having the attribute with the given value.
    fn find_by_attribute(&self, name: &str, value: &str) -> Option<Self>;
    /// First descendant matching [`FOCUSABLE_SELECTOR`].
    fn first_focusable(&self) -> Option<Self>;
    /// Creates a new child element with the given tag and CSS class.
    fn append_child(&self, tag: &str, class: &str) -> Option<Self>;
    /// Detaches the element from its parent.
    fn remove(&self);
}

/// Document hosting the widget.
pub trait HostDocument: 'static {
    /// Element type of the document.
    type Element: HostElement;

    /// Whether the document is still being parsed.
    fn is_loading(&self) -> bool;
    /// Runs the task once the document is ready.
    fn on_ready(&self, task: Task);
    /// Element with the given id.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    /// Element that currently has keyboard focus.
    fn active_element(&self) -> Option<Self::Element>;
}

/// Runs tasks after a delay on the UI thread.
pub trait Scheduler {
    /// Runs the task once after at least `delay` has passed.
    fn defer(&self, delay: Duration, task: Task);
}

/// Mapping engine creating map surfaces.
pub trait MapEngine {
    /// Creates a surface from the builder.
    fn create_surface(&self, builder: MapSurfaceBuilder) -> Result<MapSurface, WidgetError>;
}

/// Engine building surfaces in-process.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinEngine;

impl MapEngine for BuiltinEngine {
    fn create_surface(&self, builder: MapSurfaceBuilder) -> Result<MapSurface, WidgetError> {
        builder.build()
    }
}
