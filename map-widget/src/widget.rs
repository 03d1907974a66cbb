//! [`MapWidget`] ties the components together over the life cycle of a host element.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::{attr, ConfigResolver, ElementAttributes, WidgetConfig, ATTRIBUTE_PREFIX};
use crate::css;
use crate::error::WidgetError;
use crate::filter;
use crate::layer::{CustomIcon, MarkerIcon, TileLayer};
use crate::messages::{self, Locale};
use crate::modal::{ModalController, ModalState, ModalTarget};
use crate::offset::{self, OFFSET_DELAY};
use crate::platform::{BuiltinEngine, HostDocument, HostElement, MapEngine, Scheduler};
use crate::presenter::ErrorPresenter;
use crate::surface::{InteractionOptions, MapSurface, MapSurfaceBuilder, PaneKind};
use crate::tile_registry;

/// Color of the custom marker icon.
pub const CUSTOM_MARKER_COLOR: &str = "#d63e2a";

const PANES: [PaneKind; 2] = [PaneKind::Tile, PaneKind::Marker];

/// Environment the widget runs in.
pub struct WidgetHost<D: HostDocument> {
    /// Document containing the widget.
    pub document: Rc<D>,
    /// Scheduler for the deferred steps.
    pub scheduler: Rc<dyn Scheduler>,
    /// Mapping engine. Without it every attach fails with [`WidgetError::DependencyMissing`].
    pub engine: Option<Rc<dyn MapEngine>>,
}

impl<D: HostDocument> Clone for WidgetHost<D> {
    fn clone(&self) -> Self {
        Self {
            document: self.document.clone(),
            scheduler: self.scheduler.clone(),
            engine: self.engine.clone(),
        }
    }
}

impl<D: HostDocument> WidgetHost<D> {
    /// Host using the [`BuiltinEngine`].
    pub fn new(document: Rc<D>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            document,
            scheduler,
            engine: Some(Rc::new(BuiltinEngine)),
        }
    }

    /// Replaces the mapping engine.
    pub fn with_engine(mut self, engine: Option<Rc<dyn MapEngine>>) -> Self {
        self.engine = engine;
        self
    }
}

/// Life cycle stage of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    /// Not attached yet.
    Uninitialized,
    /// Attached, the surface is not created yet.
    Loading,
    /// The surface is displayed.
    Ready,
    /// Initialization failed and the error panel is shown. Terminal until detached.
    Failed,
    /// Detached from the host element.
    Destroyed,
}

struct Inner<D: HostDocument> {
    host: WidgetHost<D>,
    element: D::Element,
    state: WidgetState,
    config: Option<WidgetConfig>,
    locale: Locale,
    container: Option<D::Element>,
    surface: Option<MapSurface>,
    panes: Vec<(PaneKind, D::Element)>,
    presenter: ErrorPresenter<D::Element>,
    modal: Option<ModalTarget<D::Element>>,
    modal_controller: Rc<ModalController<D>>,
    error: Option<WidgetError>,
}

impl<D: HostDocument> Inner<D> {
    fn fail(&mut self, error: WidgetError) {
        log::error!("Map widget initialization failed: {error}");
        self.presenter.show_error(&messages::describe(&error, self.locale));
        self.surface = None;
        self.state = WidgetState::Failed;
        self.error = Some(error);
    }

    fn map_container(&self) -> D::Element {
        self.element
            .find_by_attribute(css::TARGET_ATTRIBUTE, css::TARGET_MAP)
            .unwrap_or_else(|| self.element.clone())
    }

    fn create_surface(
        &self,
        config: &WidgetConfig,
        container: &D::Element,
    ) -> Result<MapSurface, WidgetError> {
        if !container.is_connected() {
            return Err(WidgetError::Initialization(
                "map container is not attached to the document".to_string(),
            ));
        }

        let engine = self.host.engine.as_ref().ok_or_else(|| {
            WidgetError::DependencyMissing("no mapping engine is registered".to_string())
        })?;

        let descriptor = tile_registry::resolve(&config.tile_layer_key);
        let icon = if config.custom_marker {
            MarkerIcon::Custom(CustomIcon::location_pin(CUSTOM_MARKER_COLOR))
        } else {
            MarkerIcon::DefaultPin
        };

        let builder = MapSurfaceBuilder::default()
            .with_latlon(config.latitude, config.longitude)
            .with_z_level(config.zoom_level)
            .with_size(container.client_size())
            .with_tile_layer(TileLayer::new(descriptor, config.api_key.clone()))
            .with_marker(icon)
            .with_interaction(InteractionOptions::default());

        engine.create_surface(builder)
    }

    fn sync_panes(&self) {
        let Some(surface) = &self.surface else {
            return;
        };

        for (kind, element) in &self.panes {
            element.set_style("filter", surface.pane(*kind).filter());
        }
    }

    fn refresh_size(&mut self) {
        let Some(container) = &self.container else {
            return;
        };

        let size = container.client_size();
        if let Some(surface) = &mut self.surface {
            surface.set_size(size);
        }
    }

    fn release(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }

        for (_, pane) in self.panes.drain(..) {
            pane.remove();
        }
        self.container = None;
    }
}

/// A map displayed in a host element.
///
/// The widget never returns errors to the caller: failures during initialization are shown in
/// the error panel, and host calls made while there is no map do nothing.
pub struct MapWidget<D: HostDocument> {
    inner: Rc<RefCell<Inner<D>>>,
}

impl<D: HostDocument> MapWidget<D> {
    /// Attaches a widget to the element.
    ///
    /// The configuration is read from the `data-map-widget-*` attributes of the element. If the
    /// document is still loading, the map is created once it is ready.
    pub fn attach(host: WidgetHost<D>, element: D::Element) -> Self {
        let locale = element
            .attribute(&format!("{ATTRIBUTE_PREFIX}{}", attr::LOCALE))
            .map(|tag| Locale::from_tag(&tag))
            .unwrap_or_default();

        let inner = Inner {
            modal_controller: Rc::new(ModalController::new(
                host.document.clone(),
                host.scheduler.clone(),
            )),
            host,
            presenter: ErrorPresenter::new(element.clone()),
            element,
            state: WidgetState::Uninitialized,
            config: None,
            locale,
            container: None,
            surface: None,
            panes: vec![],
            modal: None,
            error: None,
        };
        let widget = Self {
            inner: Rc::new(RefCell::new(inner)),
        };

        let configured = {
            let mut inner = widget.inner.borrow_mut();
            inner.presenter.show_loading();
            inner.state = WidgetState::Loading;

            let resolved = ConfigResolver::widget().resolve(&ElementAttributes(&inner.element));
            match resolved {
                Ok(config) => {
                    inner.locale = config.locale;
                    inner.modal = config.modal_id.clone().map(ModalTarget::Id);
                    inner.config = Some(config);
                    true
                }
                Err(error) => {
                    inner.fail(error);
                    false
                }
            }
        };

        if !configured {
            return widget;
        }

        let document = widget.inner.borrow().host.document.clone();
        if document.is_loading() {
            log::debug!("Document is loading, map creation deferred");
            let weak = Rc::downgrade(&widget.inner);
            document.on_ready(Box::new(move || initialize(&weak)));
        } else {
            initialize(&Rc::downgrade(&widget.inner));
        }

        widget
    }

    /// Releases the map surface and removes the panes from the document.
    ///
    /// Deferred steps that have not run yet are dropped. Calling it again does nothing.
    pub fn detach(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.state == WidgetState::Destroyed {
            return;
        }

        inner.release();
        inner.element.remove_class(css::INITIALIZED);
        inner.element.remove_class(css::LOADING);
        inner.state = WidgetState::Destroyed;
        log::debug!("Map widget detached");
    }

    /// Life cycle stage of the widget.
    pub fn state(&self) -> WidgetState {
        self.inner.borrow().state
    }

    /// Resolved configuration. `None` if the attributes were invalid.
    pub fn config(&self) -> Option<WidgetConfig> {
        self.inner.borrow().config.clone()
    }

    /// Error that made the initialization fail.
    pub fn error(&self) -> Option<WidgetError> {
        self.inner.borrow().error.clone()
    }

    /// Whether the widget has a live map surface.
    pub fn has_surface(&self) -> bool {
        self.inner
            .borrow()
            .surface
            .as_ref()
            .is_some_and(MapSurface::is_alive)
    }

    /// Calls `f` with the map surface, if there is one.
    pub fn with_surface<T>(&self, f: impl FnOnce(&MapSurface) -> T) -> Option<T> {
        let inner = self.inner.borrow();
        inner.surface.as_ref().filter(|s| s.is_alive()).map(f)
    }

    /// Re-reads the size of the map container, e.g. after the container has been resized.
    pub fn invalidate_size(&self) {
        self.inner.borrow_mut().refresh_size();
    }

    /// Applies or clears the grayscale filter of the tiles.
    pub fn set_grayscale(&self, enabled: bool) {
        let mut inner = self.inner.borrow_mut();
        if let Some(config) = &mut inner.config {
            config.grayscale = enabled;
        }

        let Some(surface) = inner.surface.as_mut() else {
            return;
        };
        filter::set_grayscale(surface, enabled);
        inner.sync_panes();
    }

    /// Uses the element as modal dialog instead of the one named by the `modal-id` attribute.
    pub fn set_modal_element(&self, modal: D::Element) {
        self.inner.borrow_mut().modal = Some(ModalTarget::Element(modal));
    }

    /// State of the modal dialog, if the widget has one and it is in the document.
    pub fn modal_state(&self) -> Option<ModalState> {
        let (controller, target) = self.modal_parts()?;
        controller.target_state(&target)
    }

    /// Opens the modal dialog of the widget.
    pub fn open_modal(&self) {
        self.with_modal(|controller, target| controller.open_target(target));
    }

    /// Closes the modal dialog of the widget.
    pub fn close_modal(&self) {
        self.with_modal(|controller, target| controller.close_target(target));
    }

    fn with_modal(
        &self,
        action: impl FnOnce(&ModalController<D>, &ModalTarget<D::Element>) -> Result<(), WidgetError>,
    ) {
        if self.state() == WidgetState::Destroyed {
            return;
        }

        // Focus changes run host code that may call back into the widget.
        let Some((controller, target)) = self.modal_parts() else {
            log::debug!("Map widget has no modal");
            return;
        };

        match action(&controller, &target) {
            Ok(()) => {}
            Err(error) if error.is_fatal() => log::warn!("{error}"),
            Err(error) => log::debug!("{error}"),
        }
    }

    fn modal_parts(&self) -> Option<(Rc<ModalController<D>>, ModalTarget<D::Element>)> {
        let inner = self.inner.borrow();
        let target = inner.modal.clone()?;
        Some((inner.modal_controller.clone(), target))
    }
}

fn initialize<D: HostDocument>(weak: &Weak<RefCell<Inner<D>>>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let mut inner = inner.borrow_mut();
    if inner.state != WidgetState::Loading {
        return;
    }

    let Some(config) = inner.config.clone() else {
        return;
    };

    let container = inner.map_container();
    let mut surface = match inner.create_surface(&config, &container) {
        Ok(surface) => surface,
        Err(error) => {
            inner.fail(error);
            return;
        }
    };

    filter::set_grayscale(&mut surface, config.grayscale);

    let mut panes = Vec::with_capacity(PANES.len());
    for kind in PANES {
        match container.append_child("div", kind.css_class()) {
            Some(pane) => panes.push((kind, pane)),
            None => {
                for (_, pane) in panes {
                    pane.remove();
                }
                inner.fail(WidgetError::Initialization(format!(
                    "failed to create the {kind:?} pane"
                )));
                return;
            }
        }
    }

    if let Some(fraction) = config.marker_offset {
        let liveness = surface.liveness();
        let weak = weak.clone();
        inner.host.scheduler.defer(
            OFFSET_DELAY,
            Box::new(move || {
                if !liveness.is_alive() {
                    return;
                }
                let Some(inner) = weak.upgrade() else {
                    return;
                };

                let mut inner = inner.borrow_mut();
                inner.refresh_size();
                if let Some(surface) = inner.surface.as_mut() {
                    if let Some(diff_x) = offset::offset_marker_horizontally(surface, fraction) {
                        log::debug!("Marker offset to {fraction} of the width, panned by {diff_x}px");
                    }
                }
            }),
        );
    }

    inner.container = Some(container);
    inner.surface = Some(surface);
    inner.panes = panes;
    inner.sync_panes();

    inner.presenter.hide_loading();
    inner.presenter.clear_error();
    inner.element.add_class(css::INITIALIZED);
    inner.state = WidgetState::Ready;
    log::info!(
        "Map widget ready at ({}, {})",
        config.latitude,
        config.longitude
    );
}

impl<D: HostDocument> Drop for MapWidget<D> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.release();
        }
    }
}
