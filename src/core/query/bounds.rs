//! Bounding box around a point, for nearby-title lookups
//!
//! The box is `2 * radius` metres tall and 1.618 times as wide, with the
//! longitude span widened by `1 / cos(latitude)`.

use crate::domain::{Point, Result, TitleSyncError};

/// Metres per degree of latitude
const METRES_PER_DEGREE: f64 = 111_000.0;

/// Width-to-height ratio of the search box
const WIDTH_RATIO: f64 = 1.618;

/// Default search radius in metres
pub const DEFAULT_RADIUS_METRES: f64 = 200.0;

/// Largest accepted search radius in metres
pub const MAX_RADIUS_METRES: f64 = 300.0;

/// Axis-aligned box in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub max_lng: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Box centred on `center` (x = longitude, y = latitude)
    ///
    /// # Errors
    ///
    /// Returns a validation error for a radius outside `(0, 300]`, or a
    /// latitude outside `[-90, 90]` or longitude outside `[-180, 180]`.
    pub fn around(center: Point, radius_metres: f64) -> Result<Self> {
        if !(radius_metres > 0.0 && radius_metres <= MAX_RADIUS_METRES) {
            return Err(TitleSyncError::Validation(format!(
                "radius must be greater than 0 and at most {MAX_RADIUS_METRES}, got {radius_metres}"
            )));
        }
        if !(-90.0..=90.0).contains(&center.latitude()) {
            return Err(TitleSyncError::Validation(format!(
                "latitude must be between -90 and 90, got {}",
                center.latitude()
            )));
        }
        if !(-180.0..=180.0).contains(&center.longitude()) {
            return Err(TitleSyncError::Validation(format!(
                "longitude must be between -180 and 180, got {}",
                center.longitude()
            )));
        }

        let lat_delta = radius_metres / METRES_PER_DEGREE;
        let lng_delta = (radius_metres * WIDTH_RATIO)
            / (METRES_PER_DEGREE * center.latitude().to_radians().cos());

        Ok(Self {
            min_lng: center.longitude() - lng_delta,
            max_lng: center.longitude() + lng_delta,
            min_lat: center.latitude() - lat_delta,
            max_lat: center.latitude() + lat_delta,
        })
    }

    /// Strict containment, matching the SQL predicate
    pub fn contains(&self, point: &Point) -> bool {
        point.longitude() < self.max_lng
            && point.longitude() > self.min_lng
            && point.latitude() > self.min_lat
            && point.latitude() < self.max_lat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_box_at_equator() {
        let bbox = BoundingBox::around(Point::new(0.0, 0.0).unwrap(), 111.0).unwrap();
        assert!(approx(bbox.max_lat, 0.001));
        assert!(approx(bbox.min_lat, -0.001));
        assert!(approx(bbox.max_lng, 0.001618));
        assert!(approx(bbox.min_lng, -0.001618));
    }

    #[test]
    fn test_longitude_span_widens_with_latitude() {
        let london = BoundingBox::around(Point::new(-0.1276, 51.5072).unwrap(), 200.0).unwrap();
        let lat_span = london.max_lat - london.min_lat;
        let lng_span = london.max_lng - london.min_lng;
        let expected = lat_span * WIDTH_RATIO / 51.5072_f64.to_radians().cos();
        assert!(approx(lng_span, expected));
    }

    #[test]
    fn test_contains_is_strict() {
        let center = Point::new(1.0, 1.0).unwrap();
        let bbox = BoundingBox::around(center, 100.0).unwrap();
        assert!(bbox.contains(&center));
        assert!(!bbox.contains(&Point::new(bbox.max_lng, 1.0).unwrap()));
        assert!(!bbox.contains(&Point::new(1.0, bbox.min_lat).unwrap()));
    }

    #[test]
    fn test_radius_limits() {
        let center = Point::new(0.0, 0.0).unwrap();
        assert!(BoundingBox::around(center, 0.0).is_err());
        assert!(BoundingBox::around(center, 300.0).is_ok());
        assert!(BoundingBox::around(center, 300.5).is_err());
        assert!(BoundingBox::around(center, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        assert!(BoundingBox::around(Point::new(0.0, 91.0).unwrap(), 100.0).is_err());
        assert!(BoundingBox::around(Point::new(181.0, 0.0).unwrap(), 100.0).is_err());
    }
}
