//! Content of a map surface: the raster [`TileLayer`] and the location [`Marker`].

mod attribution;
mod marker;
mod tile_layer;

pub use attribution::Attribution;
pub use marker::{CustomIcon, Marker, MarkerIcon};
pub use tile_layer::{TileLayer, TileRequest};
