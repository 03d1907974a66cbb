use map_widget_types::cartesian::{Point2d, Rect, Size, Vector2d};
use map_widget_types::geo::{GeoPoint2d, Projection, WebMercator};

/// Currently displayed part of the map: center position in Web Mercator coordinates,
/// resolution (map units per pixel) and the size of the map element in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    position: Point2d,
    resolution: f64,
    size: Size,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            position: Point2d::origin(),
            resolution: 1.0,
            size: Size::new(0.0, 0.0),
        }
    }
}

impl MapView {
    /// Creates a view centered at the projected position.
    pub fn new(position: Point2d, resolution: f64) -> Self {
        Self {
            position,
            resolution,
            ..Default::default()
        }
    }

    /// Creates a view centered at the geographic position. Returns `None` if the position cannot
    /// be projected or the resolution is not a positive number.
    pub fn new_geo(position: &GeoPoint2d, resolution: f64) -> Option<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return None;
        }

        let projected = WebMercator::default().project(position)?;
        Some(Self::new(projected, resolution))
    }

    /// Center of the view in map coordinates.
    pub fn position(&self) -> Point2d {
        self.position
    }

    /// Center of the view in geographic coordinates.
    pub fn position_geo(&self) -> Option<GeoPoint2d> {
        WebMercator::default().unproject(&self.position)
    }

    /// Map units per pixel.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Copy of the view with a different resolution.
    pub fn with_resolution(&self, resolution: f64) -> Self {
        Self {
            resolution,
            ..*self
        }
    }

    /// Size of the map element in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Copy of the view with a different size. The center stays at the same map position.
    pub fn with_size(&self, new_size: Size) -> Self {
        Self {
            size: new_size,
            ..*self
        }
    }

    /// Map coordinates of the given pixel.
    pub fn screen_to_map(&self, px_position: Point2d) -> Point2d {
        Point2d::new(
            self.position.x + (px_position.x - self.size.half_width()) * self.resolution,
            self.position.y + (self.size.half_height() - px_position.y) * self.resolution,
        )
    }

    /// Pixel coordinates of the given map point. `None` if the view has no size yet.
    pub fn map_to_screen(&self, point: Point2d) -> Option<Point2d> {
        if self.size.is_zero() {
            return None;
        }

        Some(Point2d::new(
            self.size.half_width() + (point.x - self.position.x) / self.resolution,
            self.size.half_height() - (point.y - self.position.y) / self.resolution,
        ))
    }

    /// Pixel coordinates of the given geographic point.
    pub fn geo_to_screen(&self, point: &GeoPoint2d) -> Option<Point2d> {
        let projected = WebMercator::default().project(point)?;
        self.map_to_screen(projected)
    }

    /// Area of the map covered by the view. `None` if the view has no size yet.
    pub fn get_bbox(&self) -> Option<Rect> {
        if self.size.is_zero() {
            return None;
        }

        let corners = [
            self.screen_to_map(Point2d::new(0.0, 0.0)),
            self.screen_to_map(Point2d::new(self.size.width(), self.size.height())),
        ];
        Rect::from_points(corners.iter())
    }

    /// Moves the view so that the map point under `from` pixel ends up under `to` pixel.
    pub fn translate_by_pixels(&self, from: Point2d, to: Point2d) -> Self {
        let delta = self.screen_to_map(to) - self.screen_to_map(from);
        self.translate(delta)
    }

    /// Moves the map content by the vector given in map units.
    pub fn translate(&self, delta: Vector2d) -> Self {
        Self {
            position: self.position - delta,
            ..*self
        }
    }

    /// Moves the viewport by the given number of pixels: positive `dx` moves it right (the content
    /// shifts left), positive `dy` moves it down.
    pub fn pan_by(&self, dx: f64, dy: f64) -> Self {
        self.translate_by_pixels(Point2d::new(dx, dy), Point2d::new(0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use map_widget_types::latlon;

    use super::*;

    #[test]
    fn screen_to_map_size() {
        let view = MapView::default().with_size(Size::new(100.0, 100.0));

        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(0.0, 0.0)),
            Point2d::new(-50.0, 50.0),
            epsilon = 0.0001,
        );
        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(50.0, 50.0)),
            Point2d::new(0.0, 0.0),
            epsilon = 0.0001,
        );

        let view = MapView::default().with_size(Size::new(200.0, 50.0));

        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(25.0, 49.0)),
            Point2d::new(-75.0, -24.0),
            epsilon = 0.0001,
        );
    }

    #[test]
    fn screen_to_map_position_and_resolution() {
        let view = MapView::new(Point2d::new(-100.0, -100.0), 2.0).with_size(Size::new(100.0, 100.0));

        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(0.0, 0.0)),
            Point2d::new(-200.0, 0.0),
            epsilon = 0.0001,
        );
        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(100.0, 100.0)),
            Point2d::new(0.0, -200.0),
            epsilon = 0.0001,
        );
    }

    #[test]
    fn map_to_screen_is_inverse() {
        let view = MapView::new(Point2d::new(300.0, -20.0), 0.5).with_size(Size::new(640.0, 480.0));
        let pixel = Point2d::new(17.0, 400.0);
        let back = view
            .map_to_screen(view.screen_to_map(pixel))
            .expect("view has size");
        assert_abs_diff_eq!(back, pixel, epsilon = 0.0001);
    }

    #[test]
    fn map_to_screen_without_size() {
        let view = MapView::default();
        assert!(view.map_to_screen(Point2d::new(0.0, 0.0)).is_none());
        assert!(view.get_bbox().is_none());
    }

    #[test]
    fn pan_by_moves_content_opposite() {
        let view = MapView::new(Point2d::new(0.0, 0.0), 2.0).with_size(Size::new(100.0, 100.0));
        let panned = view.pan_by(10.0, 5.0);

        assert_abs_diff_eq!(panned.position(), Point2d::new(20.0, -10.0), epsilon = 0.0001);

        let old_center = panned
            .map_to_screen(Point2d::new(0.0, 0.0))
            .expect("view has size");
        assert_abs_diff_eq!(old_center, Point2d::new(40.0, 45.0), epsilon = 0.0001);
    }

    #[test]
    fn translate_by_pixels() {
        let view = MapView::default().with_size(Size::new(100.0, 100.0));
        let moved = view.translate_by_pixels(Point2d::new(50.0, 50.0), Point2d::new(60.0, 50.0));
        let center = moved
            .map_to_screen(Point2d::new(0.0, 0.0))
            .expect("view has size");
        assert_abs_diff_eq!(center, Point2d::new(60.0, 50.0), epsilon = 0.0001);
    }

    #[test]
    fn bbox() {
        let view = MapView::new(Point2d::new(10.0, 10.0), 1.0).with_size(Size::new(20.0, 10.0));
        assert_eq!(view.get_bbox(), Some(Rect::new(0.0, 5.0, 20.0, 15.0)));
    }

    #[test]
    fn geo_position() {
        let view = MapView::new_geo(&latlon!(51.505, -0.09), 10.0).expect("valid view");
        assert_abs_diff_eq!(
            view.position_geo().expect("unprojectable"),
            latlon!(51.505, -0.09),
            epsilon = 1e-9
        );

        assert!(MapView::new_geo(&latlon!(f64::NAN, 0.0), 10.0).is_none());
        assert!(MapView::new_geo(&latlon!(0.0, 0.0), 0.0).is_none());
    }
}
