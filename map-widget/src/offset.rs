//! Horizontal shift of the viewport placing the marker off center.

use std::time::Duration;

use crate::surface::MapSurface;

/// Delay after creation of the surface before the offset is applied, so that the container has
/// its final size.
pub const OFFSET_DELAY: Duration = Duration::from_millis(100);

/// Number of pixels the viewport has to be panned by for a point in the center to end up at
/// `fraction` of `width`.
pub fn horizontal_offset(width: f64, fraction: f64) -> f64 {
    width * 0.5 - width * fraction
}

/// Pans the surface horizontally so that the marker, initially in the center, is displayed at
/// `fraction` of the map width.
///
/// Returns the applied pan in pixels, or `None` if the surface has no width yet or was released.
pub fn offset_marker_horizontally(surface: &mut MapSurface, fraction: f64) -> Option<f64> {
    if !surface.is_alive() {
        return None;
    }

    let width = surface.view().size().width();
    if width <= 0.0 {
        log::debug!("Map has no width yet, marker offset skipped");
        return None;
    }

    let diff_x = horizontal_offset(width, fraction);
    surface.pan_by(diff_x, 0.0);
    Some(diff_x)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use map_widget_types::cartesian::Size;

    use super::*;
    use crate::layer::MarkerIcon;
    use crate::surface::MapSurfaceBuilder;

    fn surface(width: f64) -> MapSurface {
        MapSurfaceBuilder::default()
            .with_latlon(51.505, -0.09)
            .with_z_level(13)
            .with_size(Size::new(width, 300.0))
            .with_marker(MarkerIcon::DefaultPin)
            .build()
            .expect("valid surface")
    }

    #[test]
    fn offset_formula() {
        assert_abs_diff_eq!(horizontal_offset(1000.0, 0.66), -160.0, epsilon = 1e-9);
        assert_abs_diff_eq!(horizontal_offset(800.0, 0.5), 0.0);
        assert_abs_diff_eq!(horizontal_offset(800.0, 0.25), 200.0);
    }

    #[test]
    fn marker_moves_to_fraction() {
        let mut surface = surface(1000.0);
        let diff_x = offset_marker_horizontally(&mut surface, 0.66).expect("offset applied");

        assert_abs_diff_eq!(diff_x, -160.0, epsilon = 1e-9);
        let marker = surface.marker_screen_position().expect("has marker");
        assert_abs_diff_eq!(marker.x, 660.0, epsilon = 1e-6);
        assert_abs_diff_eq!(marker.y, 150.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_width_is_skipped() {
        let mut surface = surface(0.0);
        let position = surface.view().position();
        assert!(offset_marker_horizontally(&mut surface, 0.66).is_none());
        assert_eq!(surface.view().position(), position);
    }

    #[test]
    fn released_surface_is_skipped() {
        let mut surface = surface(1000.0);
        surface.release();
        assert!(offset_marker_horizontally(&mut surface, 0.66).is_none());
    }
}
