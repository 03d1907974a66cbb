use crate::cartesian::Point2d;
use crate::geo::{Datum, GeoPoint, GeoPoint2d, NewGeoPoint};

/// Conversion between geographic coordinates and the map plane.
pub trait Projection {
    /// Projects a geographic point. Returns `None` if the point cannot be projected.
    fn project(&self, input: &GeoPoint2d) -> Option<Point2d>;
    /// Converts a projected point back into geographic coordinates.
    fn unproject(&self, input: &Point2d) -> Option<GeoPoint2d>;
}

/// Latitude beyond which the projection is clamped, so that the world is a square.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Spherical Web Mercator (EPSG:3857), used by virtually all public tile services.
///
/// Latitudes are clamped to [`MAX_LATITUDE`]; points outside of `[-90, 90]` are rejected.
#[derive(Debug, Copy, Clone, Default)]
pub struct WebMercator {
    datum: Datum,
}

impl WebMercator {
    /// Creates a projection on the given datum.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }

    /// Half of the world extent along any axis, in meters.
    pub fn max_extent(&self) -> f64 {
        self.datum.semimajor() * std::f64::consts::PI
    }
}

impl Projection for WebMercator {
    fn project(&self, input: &GeoPoint2d) -> Option<Point2d> {
        if !(-90.0..=90.0).contains(&input.lat()) {
            return None;
        }

        let lat = input.lat().clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = self.datum.semimajor() * input.lon_rad();
        let y = self.datum.semimajor() * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();

        if x.is_finite() && y.is_finite() {
            Some(Point2d::new(x, y))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Point2d) -> Option<GeoPoint2d> {
        if !input.x.is_finite() || !input.y.is_finite() {
            return None;
        }

        let lat = std::f64::consts::FRAC_PI_2
            - 2.0 * (-input.y / self.datum.semimajor()).exp().atan();
        let lon = input.x / self.datum.semimajor();

        Some(GeoPoint2d::latlon(lat.to_degrees(), lon.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::latlon;

    #[test]
    fn project_origin() {
        let projection = WebMercator::default();
        let projected = projection.project(&latlon!(0.0, 0.0)).expect("projectable");
        assert_abs_diff_eq!(projected.x, 0.0);
        assert_abs_diff_eq!(projected.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn project_antimeridian() {
        let projection = WebMercator::default();
        let projected = projection.project(&latlon!(0.0, 180.0)).expect("projectable");
        assert_abs_diff_eq!(projected.x, projection.max_extent(), epsilon = 1e-6);
    }

    #[test]
    fn unproject_returns_original_point() {
        let projection = WebMercator::default();
        let point = latlon!(51.505, -0.09);
        let projected = projection.project(&point).expect("projectable");
        let unprojected = projection.unproject(&projected).expect("unprojectable");
        assert_abs_diff_eq!(unprojected, point, epsilon = 1e-9);
    }

    #[test]
    fn poles_are_clamped() {
        let projection = WebMercator::default();
        let pole = projection.project(&latlon!(90.0, 0.0)).expect("projectable");
        assert_abs_diff_eq!(pole.y, projection.max_extent(), epsilon = 1.0);
    }

    #[test]
    fn invalid_latitude_cannot_be_projected() {
        let projection = WebMercator::default();
        assert!(projection.project(&latlon!(120.0, 0.0)).is_none());
        assert!(projection.project(&latlon!(f64::NAN, 0.0)).is_none());
        assert!(projection.project(&latlon!(0.0, f64::INFINITY)).is_none());
    }
}
