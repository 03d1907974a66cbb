//! An embeddable map display widget. It attaches to a host element, reads its configuration from
//! `data-map-widget-*` attributes, shows a raster tile map centered on a location marker, and
//! drives a companion modal dialog.
//!
//! # Quick start
//!
//! ```no_run
//! use std::rc::Rc;
//!
//! use map_widget::platform::headless::{HeadlessDocument, ManualScheduler};
//! use map_widget::{MapWidget, WidgetHost, WidgetState};
//!
//! let document = Rc::new(HeadlessDocument::new());
//! let element = document
//!     .create_element("div")
//!     .with_attribute("data-map-widget-latitude", "51.505")
//!     .with_attribute("data-map-widget-longitude", "-0.09")
//!     .with_attribute("data-map-widget-tile-layer", "osm_de");
//! document.body().append(&element);
//!
//! let host = WidgetHost::new(document.clone(), Rc::new(ManualScheduler::new()));
//! let widget = MapWidget::attach(host, element);
//! assert_eq!(widget.state(), WidgetState::Ready);
//! ```
//!
//! # Main components
//!
//! * [`ConfigResolver`] turns string attributes into a typed [`WidgetConfig`].
//! * [`MapSurfaceBuilder`] creates the [`MapSurface`]: a [`MapView`] with a
//!   [`tile layer`](layer::TileLayer) from the [`tile_registry`] and a [`marker`](layer::Marker).
//! * [`filter`] and [`offset`] adjust the surface after creation.
//! * [`modal::ModalController`] opens and closes the companion dialog.
//! * [`presenter::ErrorPresenter`] shows the loading indicator and the error panel.
//!
//! The widget does not talk to a browser directly. Everything it needs from the host goes
//! through the traits of the [`platform`] module.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod config;
pub mod css;
pub mod error;
pub mod filter;
pub mod layer;
pub mod messages;
pub mod modal;
pub mod offset;
pub mod platform;
pub mod presenter;
mod surface;
pub mod tile_registry;
mod tile_schema;
mod view;
mod widget;

pub use config::{ConfigResolver, WidgetConfig};
pub use error::WidgetError;
pub use map_widget_types;
pub use messages::Locale;
pub use surface::{InteractionOptions, Liveness, MapSurface, MapSurfaceBuilder, Pane, PaneKind};
pub use tile_schema::{Lod, TileIndex, TileSchema};
pub use view::MapView;
pub use widget::{MapWidget, WidgetHost, WidgetState, CUSTOM_MARKER_COLOR};
