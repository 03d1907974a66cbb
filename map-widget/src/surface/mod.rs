//! [`MapSurface`] is the live map owned by a widget instance.

use std::cell::Cell;
use std::rc::Rc;

use map_widget_types::cartesian::{Point2d, Size};

use crate::error::WidgetError;
use crate::layer::{Attribution, Marker, TileLayer, TileRequest};
use crate::view::MapView;

mod builder;

pub use builder::MapSurfaceBuilder;

/// Rendering layer of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    /// Pane holding the raster tiles.
    Tile,
    /// Pane holding the marker.
    Marker,
}

impl PaneKind {
    /// CSS class of the element representing the pane in the host document.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Tile => crate::css::TILE_PANE,
            Self::Marker => crate::css::MARKER_PANE,
        }
    }
}

/// Visual state of a pane.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pane {
    filter: Option<String>,
}

impl Pane {
    /// CSS filter applied to the pane, if any.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Sets or clears the CSS filter.
    pub fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter;
    }
}

/// User interactions enabled on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionOptions {
    /// Panning by dragging.
    pub dragging: bool,
    /// Zooming with the mouse wheel. Off by default so the map does not capture page scrolling.
    pub scroll_wheel_zoom: bool,
    /// Zooming in by double click.
    pub double_click_zoom: bool,
    /// Pinch zoom on touch screens.
    pub touch_zoom: bool,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            dragging: true,
            scroll_wheel_zoom: false,
            double_click_zoom: true,
            touch_zoom: true,
        }
    }
}

/// Shared flag telling deferred callbacks whether the surface still exists.
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    /// Whether the surface has not been released yet.
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }
}

/// A map: view, tile layer, marker and panes.
#[derive(Debug)]
pub struct MapSurface {
    view: MapView,
    zoom: u32,
    tile_layer: TileLayer,
    marker: Option<Marker>,
    tile_pane: Pane,
    marker_pane: Pane,
    interaction: InteractionOptions,
    alive: Rc<Cell<bool>>,
}

impl MapSurface {
    pub(crate) fn new(
        view: MapView,
        zoom: u32,
        tile_layer: TileLayer,
        marker: Option<Marker>,
        interaction: InteractionOptions,
    ) -> Self {
        Self {
            view,
            zoom,
            tile_layer,
            marker,
            tile_pane: Pane::default(),
            marker_pane: Pane::default(),
            interaction,
            alive: Rc::new(Cell::new(true)),
        }
    }

    /// Current view.
    pub fn view(&self) -> &MapView {
        &self.view
    }

    /// Current zoom level.
    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Changes the zoom level keeping the center. The level is clamped to the tile layer maximum.
    pub fn set_zoom(&mut self, zoom: u32) -> Result<(), WidgetError> {
        let zoom = zoom.min(self.tile_layer.max_zoom());
        let resolution = self
            .tile_layer
            .tile_schema()
            .lod_resolution(zoom)
            .ok_or_else(|| WidgetError::Initialization(format!("zoom level {zoom} is not available")))?;
        self.view = self.view.with_resolution(resolution);
        self.zoom = zoom;
        Ok(())
    }

    /// Tile layer of the surface.
    pub fn tile_layer(&self) -> &TileLayer {
        &self.tile_layer
    }

    /// Attribution of the displayed data.
    pub fn attribution(&self) -> Attribution {
        self.tile_layer.attribution()
    }

    /// Location marker, if the surface has one.
    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    /// Pixel position of the marker in the current view.
    pub fn marker_screen_position(&self) -> Option<Point2d> {
        self.marker.as_ref()?.screen_position(&self.view)
    }

    /// Enabled user interactions.
    pub fn interaction(&self) -> InteractionOptions {
        self.interaction
    }

    /// State of the pane.
    pub fn pane(&self, kind: PaneKind) -> &Pane {
        match kind {
            PaneKind::Tile => &self.tile_pane,
            PaneKind::Marker => &self.marker_pane,
        }
    }

    /// Mutable state of the pane.
    pub fn pane_mut(&mut self, kind: PaneKind) -> &mut Pane {
        match kind {
            PaneKind::Tile => &mut self.tile_pane,
            PaneKind::Marker => &mut self.marker_pane,
        }
    }

    /// Updates the pixel size of the surface after its container has been resized.
    pub fn set_size(&mut self, size: Size) {
        self.view = self.view.with_size(size);
    }

    /// Moves the viewport by the given number of pixels without animation.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.view = self.view.pan_by(dx, dy);
    }

    /// Tiles needed to display the current view.
    pub fn visible_tiles(&self) -> Result<Vec<TileRequest>, WidgetError> {
        self.tile_layer.visible_tiles(&self.view)
    }

    /// Whether the surface has not been released.
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Flag that stays readable after the surface itself is gone.
    pub fn liveness(&self) -> Liveness {
        Liveness(self.alive.clone())
    }

    /// Marks the surface as released. Callbacks holding its [`Liveness`] will see it as dead.
    pub fn release(&mut self) {
        self.alive.set(false);
    }
}

impl Drop for MapSurface {
    fn drop(&mut self) {
        self.release();
    }
}
