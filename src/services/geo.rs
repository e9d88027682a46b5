// src/services/geo.rs
// DOCUMENTATION: Great-circle helpers for nearby lookups

use geo_types::Point;

const EARTH_RADIUS_KM: f64 = 6371.0;
const KM_PER_DEGREE_LAT: f64 = 111.0;

/// Distance between two points in kilometers (haversine)
/// Points are (x = longitude, y = latitude)
pub fn haversine_km(a: Point<f64>, b: Point<f64>) -> f64 {
    let d_lat = (b.y() - a.y()).to_radians();
    let d_lon = (b.x() - a.x()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.y().to_radians().cos() * b.y().to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Latitude/longitude box enclosing a circle, used to prefilter SQL
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn around(center: Point<f64>, radius_km: f64) -> Self {
        let lat_delta = radius_km / KM_PER_DEGREE_LAT;
        // Longitude degrees shrink with latitude; avoid dividing by ~0 near the poles
        let cos_lat = center.y().to_radians().cos().max(0.01);
        let lng_delta = radius_km / (KM_PER_DEGREE_LAT * cos_lat);

        BoundingBox {
            min_lat: (center.y() - lat_delta).max(-90.0),
            max_lat: (center.y() + lat_delta).min(90.0),
            min_lng: (center.x() - lng_delta).max(-180.0),
            max_lng: (center.x() + lng_delta).min(180.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_bangkok_chiang_mai() {
        let bangkok = Point::new(100.5018, 13.7563);
        let chiang_mai = Point::new(98.9853, 18.7883);
        let d = haversine_km(bangkok, chiang_mai);
        // ~580 km as the crow flies
        assert!(d > 560.0 && d < 600.0, "got {}", d);
        assert_eq!(haversine_km(bangkok, bangkok), 0.0);
    }

    #[test]
    fn test_bounding_box_contains_circle() {
        let center = Point::new(101.37, 14.43);
        let bbox = BoundingBox::around(center, 30.0);

        assert!(bbox.min_lat < 14.43 && bbox.max_lat > 14.43);
        // A point 29 km north must be inside
        let north = Point::new(101.37, 14.43 + 29.0 / 111.0);
        assert!(north.y() <= bbox.max_lat);
        assert!(haversine_km(center, north) < 30.0);
    }
}
