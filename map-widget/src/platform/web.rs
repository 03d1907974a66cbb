//! Host environment of a browser page, on top of `web-sys`.

use std::time::Duration;

use map_widget_types::cartesian::Size;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::{HostDocument, HostElement, Scheduler, Task, FOCUSABLE_SELECTOR};
use crate::error::WidgetError;

fn log_js_error(action: &str, result: Result<impl Sized, JsValue>) {
    if let Err(err) = result {
        log::warn!("Failed to {action}: {err:?}");
    }
}

/// Element of the browser document.
#[derive(Debug, Clone, PartialEq)]
pub struct WebElement(pub HtmlElement);

impl WebElement {
    fn from_element(element: web_sys::Element) -> Option<Self> {
        element.dyn_into::<HtmlElement>().ok().map(Self)
    }
}

impl HostElement for WebElement {
    fn id(&self) -> Option<String> {
        let id = self.0.id();
        (!id.is_empty()).then_some(id)
    }

    fn is_connected(&self) -> bool {
        self.0.is_connected()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        log_js_error("set attribute", self.0.set_attribute(name, value));
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        log_js_error("add class", self.0.class_list().add_1(class));
    }

    fn remove_class(&self, class: &str) {
        log_js_error("remove class", self.0.class_list().remove_1(class));
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn style(&self, property: &str) -> Option<String> {
        self.0
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style(&self, property: &str, value: Option<&str>) {
        let style = self.0.style();
        match value {
            Some(value) => log_js_error("set style", style.set_property(property, value)),
            None => log_js_error("remove style", style.remove_property(property)),
        }
    }

    fn client_size(&self) -> Size {
        Size::new(self.0.client_width() as f64, self.0.client_height() as f64)
    }

    fn focus(&self) {
        log_js_error("focus element", self.0.focus());
    }

    fn find_by_attribute(&self, name: &str, value: &str) -> Option<Self> {
        self.0
            .query_selector(&format!("[{name}=\"{value}\"]"))
            .ok()
            .flatten()
            .and_then(Self::from_element)
    }

    fn first_focusable(&self) -> Option<Self> {
        self.0
            .query_selector(FOCUSABLE_SELECTOR)
            .ok()
            .flatten()
            .and_then(Self::from_element)
    }

    fn append_child(&self, tag: &str, class: &str) -> Option<Self> {
        let document = self.0.owner_document()?;
        let child = document
            .create_element(tag)
            .ok()
            .and_then(Self::from_element)?;
        child.add_class(class);
        self.0.append_child(&child.0).ok()?;
        Some(child)
    }

    fn remove(&self) {
        self.0.remove();
    }
}

/// The document of the current browser window.
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    /// Document of the global `window`.
    pub fn current() -> Result<Self, WidgetError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| WidgetError::DependencyMissing("no global `document` exists".into()))?;
        Ok(Self { document })
    }
}

impl HostDocument for WebDocument {
    type Element = WebElement;

    fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    fn on_ready(&self, task: Task) {
        if !self.is_loading() {
            task();
            return;
        }

        let callback = Closure::once_into_js(move || task());
        log_js_error(
            "wait for the document",
            self.document
                .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref()),
        );
    }

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document
            .get_element_by_id(id)
            .and_then(WebElement::from_element)
    }

    fn active_element(&self) -> Option<WebElement> {
        self.document
            .active_element()
            .and_then(WebElement::from_element)
    }
}

/// Scheduler backed by `window.setTimeout`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn defer(&self, delay: Duration, task: Task) {
        let Some(window) = web_sys::window() else {
            log::warn!("No global `window` exists, deferred task dropped");
            return;
        };

        let callback = Closure::once_into_js(move || task());
        let timeout = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        log_js_error(
            "schedule task",
            window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout,
            ),
        );
    }
}
