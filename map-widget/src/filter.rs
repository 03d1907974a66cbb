//! Grayscale filter of the tile pane.

use crate::surface::{MapSurface, PaneKind};

/// CSS filter value making the tiles grayscale.
pub const GRAYSCALE_FILTER: &str = "grayscale(100%)";

/// Applies (`enabled == true`) or clears the grayscale filter on the tile pane of the surface.
///
/// The marker pane is never touched, so the marker keeps its colors. Calling this repeatedly with
/// the same value has no further effect.
pub fn set_grayscale(surface: &mut MapSurface, enabled: bool) {
    let filter = enabled.then(|| GRAYSCALE_FILTER.to_string());
    let pane = surface.pane_mut(PaneKind::Tile);
    if pane.filter() != filter.as_deref() {
        log::debug!("Tile pane grayscale: {enabled}");
        pane.set_filter(filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MapSurfaceBuilder;

    fn surface() -> MapSurface {
        MapSurfaceBuilder::default()
            .with_latlon(51.505, -0.09)
            .build()
            .expect("valid surface")
    }

    #[test]
    fn applies_to_tile_pane_only() {
        let mut surface = surface();
        set_grayscale(&mut surface, true);

        assert_eq!(surface.pane(PaneKind::Tile).filter(), Some(GRAYSCALE_FILTER));
        assert_eq!(surface.pane(PaneKind::Marker).filter(), None);
    }

    #[test]
    fn round_trip_restores_empty_filter() {
        let mut surface = surface();
        set_grayscale(&mut surface, true);
        set_grayscale(&mut surface, false);

        assert_eq!(surface.pane(PaneKind::Tile).filter(), None);
    }

    #[test]
    fn idempotent() {
        let mut surface = surface();
        for _ in 0..3 {
            set_grayscale(&mut surface, true);
        }
        assert_eq!(surface.pane(PaneKind::Tile).filter(), Some(GRAYSCALE_FILTER));

        for _ in 0..3 {
            set_grayscale(&mut surface, false);
        }
        assert_eq!(surface.pane(PaneKind::Tile).filter(), None);
    }
}
