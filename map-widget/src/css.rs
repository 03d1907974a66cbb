//! CSS class names and attributes toggled by the widget. Stylesheets of the host page rely on
//! them, so they must stay stable.

/// Host element while the map is being created.
pub const LOADING: &str = "is-loading";
/// Host element once the map is ready.
pub const INITIALIZED: &str = "is-initialized";
/// Host element after a failed initialization.
pub const HAS_ERROR: &str = "has-error";
/// Loading indicator or error panel that is not displayed.
pub const HIDDEN: &str = "is-hidden";
/// Open modal dialog.
pub const MODAL_OPEN: &str = "is-open";
/// Pane element holding the raster tiles.
pub const TILE_PANE: &str = "map-widget-tile-pane";
/// Pane element holding the marker.
pub const MARKER_PANE: &str = "map-widget-marker-pane";

/// Attribute marking the child elements with a role in the widget.
pub const TARGET_ATTRIBUTE: &str = "data-map-widget-target";
/// Target value of the map container.
pub const TARGET_MAP: &str = "map";
/// Target value of the loading indicator.
pub const TARGET_LOADING: &str = "loading";
/// Target value of the error panel.
pub const TARGET_ERROR: &str = "error";
/// Target value of the element inside the error panel receiving the message.
pub const TARGET_ERROR_MESSAGE: &str = "error-message";

/// Accessibility attribute kept in sync with the modal state.
pub const ARIA_HIDDEN: &str = "aria-hidden";
