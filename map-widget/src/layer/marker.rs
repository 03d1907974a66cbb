use map_widget_types::cartesian::{Point2d, Size};
use map_widget_types::geo::GeoPoint2d;

use crate::view::MapView;

const LOCATION_PIN_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="44" viewBox="0 0 32 44"><path d="M16 0C7.2 0 0 7.2 0 16c0 12 16 28 16 28s16-16 16-28C32 7.2 24.8 0 16 0z" fill="{color}"/><circle cx="16" cy="16" r="6" fill="#ffffff"/></svg>"##;

/// Vector icon drawn instead of the default pin.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomIcon {
    /// Size of the icon in pixels.
    pub size: Size,
    /// Pixel of the icon placed exactly at the marker position, from the top left corner.
    pub anchor: Point2d,
    /// Inline SVG markup.
    pub svg: String,
}

impl CustomIcon {
    /// Teardrop shaped location pin with the tip at the marker position.
    pub fn location_pin(color: &str) -> Self {
        Self {
            size: Size::new(32.0, 44.0),
            anchor: Point2d::new(16.0, 44.0),
            svg: LOCATION_PIN_SVG.replace("{color}", color),
        }
    }
}

/// Icon of a marker.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MarkerIcon {
    /// Standard pin of the mapping engine.
    #[default]
    DefaultPin,
    /// Custom vector icon.
    Custom(CustomIcon),
}

/// Point annotation at a geographic position.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    position: GeoPoint2d,
    icon: MarkerIcon,
}

impl Marker {
    /// Creates a marker.
    pub fn new(position: GeoPoint2d, icon: MarkerIcon) -> Self {
        Self { position, icon }
    }

    /// Geographic position of the marker.
    pub fn position(&self) -> GeoPoint2d {
        self.position
    }

    /// Icon of the marker.
    pub fn icon(&self) -> &MarkerIcon {
        &self.icon
    }

    /// Pixel position of the marker in the view.
    pub fn screen_position(&self, view: &MapView) -> Option<Point2d> {
        view.geo_to_screen(&self.position)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use map_widget_types::latlon;

    use super::*;

    #[test]
    fn location_pin_color() {
        let icon = CustomIcon::location_pin("#d62828");
        assert!(icon.svg.contains("fill=\"#d62828\""));
        assert!(!icon.svg.contains("{color}"));
        assert_eq!(icon.anchor, Point2d::new(16.0, 44.0));
    }

    #[test]
    fn marker_follows_view() {
        let position = latlon!(51.505, -0.09);
        let view = MapView::new_geo(&position, 10.0)
            .expect("valid view")
            .with_size(Size::new(200.0, 100.0));

        let marker = Marker::new(position, MarkerIcon::DefaultPin);
        assert_abs_diff_eq!(
            marker.screen_position(&view).expect("has size"),
            Point2d::new(100.0, 50.0),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            marker.screen_position(&view.pan_by(-20.0, 10.0)).expect("has size"),
            Point2d::new(120.0, 40.0),
            epsilon = 1e-6
        );
        assert!(marker.screen_position(&view.with_size(Size::default())).is_none());
    }
}
