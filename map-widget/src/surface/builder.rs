use map_widget_types::cartesian::Size;
use map_widget_types::geo::{GeoPoint, GeoPoint2d};
use map_widget_types::latlon;

use super::{InteractionOptions, MapSurface};
use crate::error::WidgetError;
use crate::layer::{Marker, MarkerIcon, TileLayer};
use crate::tile_registry;
use crate::tile_schema::TileIndex;
use crate::view::MapView;

/// Zoom level used when none is given.
const DEFAULT_Z_LEVEL: u32 = 4;

/// Convenience type to initialize a [`MapSurface`].
///
/// ```
/// use map_widget::MapSurfaceBuilder;
/// use map_widget::layer::{MarkerIcon, TileLayer};
/// use map_widget::tile_registry;
///
/// let surface = MapSurfaceBuilder::default()
///     .with_latlon(51.505, -0.09)
///     .with_z_level(13)
///     .with_tile_layer(TileLayer::new(tile_registry::resolve("osm_de"), None))
///     .with_marker(MarkerIcon::DefaultPin)
///     .build()?;
/// # Ok::<(), map_widget::error::WidgetError>(())
/// ```
#[derive(Debug, Default)]
pub struct MapSurfaceBuilder {
    position: Option<GeoPoint2d>,
    z_level: Option<u32>,
    size: Option<Size>,
    tile_layer: Option<TileLayer>,
    marker: Option<MarkerIcon>,
    interaction: InteractionOptions,
}

impl MapSurfaceBuilder {
    /// Sets the center of the map. Defaults to `[0, 0]`.
    pub fn with_position(mut self, position: impl GeoPoint) -> Self {
        self.position = Some(GeoPoint2d::from(&position));
        self
    }

    /// Sets the center of the map to the given coordinates.
    pub fn with_latlon(self, lat: f64, lon: f64) -> Self {
        self.with_position(latlon!(lat, lon))
    }

    /// Sets the zoom level. Levels above the tile layer maximum are clamped to it.
    ///
    /// Defaults to `4`.
    pub fn with_z_level(mut self, z_level: u32) -> Self {
        self.z_level = Some(z_level);
        self
    }

    /// Sets the initial pixel size of the surface. Defaults to zero until the layout is known.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the tile layer. Defaults to the default registry entry.
    pub fn with_tile_layer(mut self, layer: TileLayer) -> Self {
        self.tile_layer = Some(layer);
        self
    }

    /// Places a marker with the given icon at the center position.
    pub fn with_marker(mut self, icon: MarkerIcon) -> Self {
        self.marker = Some(icon);
        self
    }

    /// Sets enabled user interactions.
    pub fn with_interaction(mut self, interaction: InteractionOptions) -> Self {
        self.interaction = interaction;
        self
    }

    /// Consumes the builder and creates the surface.
    ///
    /// Fails with [`WidgetError::Initialization`] if the position cannot be displayed or the tile
    /// layer is unusable.
    pub fn build(self) -> Result<MapSurface, WidgetError> {
        let MapSurfaceBuilder {
            position,
            z_level,
            size,
            tile_layer,
            marker,
            interaction,
        } = self;

        let position = position.unwrap_or_default();
        let tile_layer = tile_layer
            .unwrap_or_else(|| TileLayer::new(tile_registry::default_descriptor(), None));

        let requested_zoom = z_level.unwrap_or(DEFAULT_Z_LEVEL);
        let zoom = requested_zoom.min(tile_layer.max_zoom());
        if zoom != requested_zoom {
            log::warn!(
                "Zoom level {requested_zoom} is above the maximum of the `{}` tile layer, using {zoom}",
                tile_layer.descriptor().key
            );
        }

        let resolution = tile_layer
            .tile_schema()
            .lod_resolution(zoom)
            .ok_or_else(|| WidgetError::Initialization(format!("zoom level {zoom} is not available")))?;

        let view = MapView::new_geo(&position, resolution).ok_or_else(|| {
            WidgetError::Initialization(format!(
                "position ({}, {}) cannot be displayed",
                position.lat(),
                position.lon()
            ))
        })?;
        let view = view.with_size(size.unwrap_or_default());

        // Fails early on a broken url template instead of on the first tile request.
        tile_layer.tile_url(TileIndex::new(0, 0, 0))?;

        let marker = marker.map(|icon| Marker::new(position, icon));

        log::debug!(
            "Created map surface at ({}, {}), zoom {zoom}, tiles `{}`",
            position.lat(),
            position.lon(),
            tile_layer.descriptor().key
        );

        Ok(MapSurface::new(view, zoom, tile_layer, marker, interaction))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::layer::CustomIcon;
    use crate::tile_schema::TileSchema;

    #[test]
    fn constructs_surface_with_default_parameters() {
        let surface = MapSurfaceBuilder::default().build().expect("valid surface");

        assert_relative_eq!(surface.view().position().x, 0.0);
        assert_eq!(surface.zoom(), DEFAULT_Z_LEVEL);
        assert_eq!(
            surface.tile_layer().descriptor().key,
            tile_registry::DEFAULT_TILE_LAYER
        );
        assert!(surface.marker().is_none());
        assert!(surface.view().size().is_zero());
    }

    #[test]
    fn with_position_sets_position() {
        let surface = MapSurfaceBuilder::default()
            .with_position(latlon!(10.0, 20.0))
            .with_latlon(51.505, -0.09)
            .build()
            .expect("valid surface");

        let position = surface.view().position_geo().expect("unprojectable");
        assert_relative_eq!(position.lat(), 51.505, epsilon = 1e-6);
        assert_relative_eq!(position.lon(), -0.09, epsilon = 1e-6);
    }

    #[test]
    fn with_z_level_sets_resolution() {
        let surface = MapSurfaceBuilder::default()
            .with_z_level(10)
            .build()
            .expect("valid surface");

        assert_relative_eq!(
            surface.view().resolution(),
            TileSchema::web(18).lod_resolution(10).expect("level exists")
        );
    }

    #[test]
    fn z_level_is_clamped_to_layer_maximum() {
        let surface = MapSurfaceBuilder::default()
            .with_tile_layer(TileLayer::new(tile_registry::resolve("topo"), None))
            .with_z_level(20)
            .build()
            .expect("valid surface");

        assert_eq!(surface.zoom(), 17);
    }

    #[test]
    fn marker_is_placed_at_center() {
        let icon = MarkerIcon::Custom(CustomIcon::location_pin("#000"));
        let surface = MapSurfaceBuilder::default()
            .with_latlon(48.1, 11.58)
            .with_marker(icon.clone())
            .build()
            .expect("valid surface");

        let marker = surface.marker().expect("has marker");
        assert_eq!(marker.position(), latlon!(48.1, 11.58));
        assert_eq!(marker.icon(), &icon);
    }

    #[test]
    fn invalid_position_fails() {
        for (lat, lon) in [(f64::NAN, 0.0), (95.0, 0.0), (0.0, f64::INFINITY)] {
            let result = MapSurfaceBuilder::default().with_latlon(lat, lon).build();
            assert!(
                matches!(result, Err(WidgetError::Initialization(_))),
                "({lat}, {lon}) should not be displayable"
            );
        }
    }
}
