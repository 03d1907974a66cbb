use crate::error::WidgetError;
use crate::layer::Attribution;
use crate::tile_registry::TileLayerDescriptor;
use crate::tile_schema::{TileIndex, TileSchema};
use crate::view::MapView;

/// Tile that should be displayed for the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRequest {
    /// Index of the tile.
    pub index: TileIndex,
    /// URL the tile is loaded from.
    pub url: String,
}

/// Raster tile layer backed by a registry entry.
#[derive(Debug, Clone)]
pub struct TileLayer {
    descriptor: &'static TileLayerDescriptor,
    tile_schema: TileSchema,
    api_key: Option<String>,
}

impl TileLayer {
    /// Creates a layer for the given source.
    pub fn new(descriptor: &'static TileLayerDescriptor, api_key: Option<String>) -> Self {
        if descriptor.requires_api_key && api_key.is_none() {
            log::warn!(
                "Tile layer `{}` requires an API key, but none is configured",
                descriptor.key
            );
        }

        Self {
            descriptor,
            tile_schema: TileSchema::web(descriptor.max_zoom),
            api_key,
        }
    }

    /// Registry entry of the layer.
    pub fn descriptor(&self) -> &'static TileLayerDescriptor {
        self.descriptor
    }

    /// Tile schema of the layer.
    pub fn tile_schema(&self) -> &TileSchema {
        &self.tile_schema
    }

    /// Highest zoom level of the layer.
    pub fn max_zoom(&self) -> u32 {
        self.descriptor.max_zoom
    }

    /// Attribution of the layer.
    pub fn attribution(&self) -> Attribution {
        self.descriptor.attribution()
    }

    /// URL of a single tile.
    pub fn tile_url(&self, index: TileIndex) -> Result<String, WidgetError> {
        self.descriptor.tile_url(index, self.api_key.as_deref())
    }

    /// Tiles covering the view. Empty if the view has no size yet.
    pub fn visible_tiles(&self, view: &MapView) -> Result<Vec<TileRequest>, WidgetError> {
        let Some(indices) = self.tile_schema.iter_tiles(view) else {
            return Ok(vec![]);
        };

        indices
            .map(|index| {
                Ok(TileRequest {
                    index,
                    url: self.tile_url(index)?,
                })
            })
            .collect()
    }
}
