// src/services/clustering.rs
// DOCUMENTATION: Zoom-dependent clustering of campsite map markers
// PURPOSE: Group nearby campsites into cluster bubbles so the search map
// stays readable at country and province zoom levels.
//
// Points are projected to Web Mercator world pixels for the requested zoom
// (256 px tiles) and bucketed into square cells of `grid_size_px`. Every
// non-empty cell becomes one marker.

use geo_types::{coord, Point, Rect};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::CampsitePoint;

const TILE_SIZE: f64 = 256.0;
/// Web Mercator is undefined at the poles
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;
pub const DEFAULT_GRID_SIZE_PX: f64 = 60.0;
pub const DEFAULT_MAX_ZOOM: u8 = 16;
/// Deepest zoom the map client can request
pub const MAX_MAP_ZOOM: u8 = 22;

/// A campsite position on the map
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPoint {
    pub id: Uuid,
    /// x = longitude, y = latitude
    pub position: Point<f64>,
}

impl MarkerPoint {
    pub fn new(id: Uuid, latitude: f64, longitude: f64) -> Self {
        MarkerPoint {
            id,
            position: Point::new(longitude, latitude),
        }
    }
}

impl From<&CampsitePoint> for MarkerPoint {
    fn from(row: &CampsitePoint) -> Self {
        MarkerPoint::new(row.id, row.latitude, row.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Point,
    Cluster,
}

/// One marker to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerCluster {
    pub kind: MarkerKind,
    pub latitude: f64,
    pub longitude: f64,
    pub count: usize,
    /// Set for single-campsite markers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campsite_id: Option<Uuid>,
    /// [west, south, east, north] of the members, set for clusters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[f64; 4]>,
    /// Zoom at which clicking the cluster splits it, set for clusters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansion_zoom: Option<u8>,
}

/// Grid clusterer
#[derive(Debug, Clone, Copy)]
pub struct MarkerClusterer {
    pub grid_size_px: f64,
    /// At and beyond this zoom every campsite gets its own marker
    pub max_zoom: u8,
}

impl Default for MarkerClusterer {
    fn default() -> Self {
        MarkerClusterer {
            grid_size_px: DEFAULT_GRID_SIZE_PX,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

impl MarkerClusterer {
    pub fn new(grid_size_px: f64, max_zoom: u8) -> Self {
        MarkerClusterer {
            grid_size_px: grid_size_px.max(1.0),
            max_zoom: max_zoom.min(MAX_MAP_ZOOM),
        }
    }

    /// Cluster `points` for display at `zoom`
    pub fn cluster(&self, points: &[MarkerPoint], zoom: u8) -> Vec<MarkerCluster> {
        let zoom = zoom.min(MAX_MAP_ZOOM);

        let mut cells: BTreeMap<(i64, i64), Vec<&MarkerPoint>> = BTreeMap::new();
        for point in points {
            cells.entry(self.cell_of(point, zoom)).or_default().push(point);
        }

        let mut markers = Vec::with_capacity(cells.len());
        for (_, mut members) in cells {
            members.sort_by_key(|p| p.id);

            if zoom >= self.max_zoom || members.len() == 1 {
                markers.extend(members.into_iter().map(single_marker));
                continue;
            }

            markers.push(MarkerCluster {
                kind: MarkerKind::Cluster,
                latitude: mean(members.iter().map(|p| p.position.y())),
                longitude: mean(members.iter().map(|p| p.position.x())),
                count: members.len(),
                campsite_id: None,
                bounds: Some(rect_to_array(&bounding_rect(&members))),
                expansion_zoom: Some(self.expansion_zoom(&members, zoom)),
            });
        }

        log::debug!(
            "Clustered {} points into {} markers at zoom {}",
            points.len(),
            markers.len(),
            zoom
        );

        markers
    }

    /// Smallest zoom above `zoom` at which the members stop sharing one cell
    fn expansion_zoom(&self, members: &[&MarkerPoint], zoom: u8) -> u8 {
        let Some(first) = members.first() else {
            return self.max_zoom;
        };

        for z in (zoom + 1)..self.max_zoom {
            let cell = self.cell_of(first, z);
            if members.iter().any(|p| self.cell_of(p, z) != cell) {
                return z;
            }
        }
        self.max_zoom
    }

    /// (row, column) of the grid cell containing the point
    fn cell_of(&self, point: &MarkerPoint, zoom: u8) -> (i64, i64) {
        let (x, y) = world_pixel(point.position.y(), point.position.x(), zoom);
        (
            (y / self.grid_size_px).floor() as i64,
            (x / self.grid_size_px).floor() as i64,
        )
    }
}

/// Web Mercator world pixel coordinates of a lat/lng at `zoom`
pub fn world_pixel(latitude: f64, longitude: f64, zoom: u8) -> (f64, f64) {
    let scale = TILE_SIZE * 2f64.powi(zoom as i32);
    let lat = latitude.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let sin = lat.to_radians().sin();

    let x = (longitude + 180.0) / 360.0 * scale;
    let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * std::f64::consts::PI)) * scale;
    (x, y)
}

fn single_marker(point: &MarkerPoint) -> MarkerCluster {
    MarkerCluster {
        kind: MarkerKind::Point,
        latitude: point.position.y(),
        longitude: point.position.x(),
        count: 1,
        campsite_id: Some(point.id),
        bounds: None,
        expansion_zoom: None,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn bounding_rect(members: &[&MarkerPoint]) -> Rect<f64> {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    for p in members {
        min_x = min_x.min(p.position.x());
        min_y = min_y.min(p.position.y());
        max_x = max_x.max(p.position.x());
        max_y = max_y.max(p.position.y());
    }

    Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y })
}

fn rect_to_array(rect: &Rect<f64>) -> [f64; 4] {
    [rect.min().x, rect.min().y, rect.max().x, rect.max().y]
}

/// Render markers as a GeoJSON FeatureCollection for map libraries
pub fn to_feature_collection(markers: &[MarkerCluster]) -> FeatureCollection {
    let features = markers
        .iter()
        .map(|marker| {
            let mut properties = JsonObject::new();
            properties.insert("kind".to_string(), json!(marker.kind));
            properties.insert("count".to_string(), json!(marker.count));
            if let Some(zoom) = marker.expansion_zoom {
                properties.insert("expansion_zoom".to_string(), json!(zoom));
            }
            if let Some(bounds) = marker.bounds {
                properties.insert("bounds".to_string(), json!(bounds));
            }

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![
                    marker.longitude,
                    marker.latitude,
                ]))),
                id: marker.campsite_id.map(|id| Id::String(id.to_string())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(n: u128, lat: f64, lng: f64) -> MarkerPoint {
        MarkerPoint::new(Uuid::from_u128(n), lat, lng)
    }

    /// Three campsites around Doi Inthanon and one in Krabi
    fn sample() -> Vec<MarkerPoint> {
        vec![
            point(1, 18.5880, 98.4870),
            point(2, 18.5905, 98.4901),
            point(3, 18.5862, 98.4822),
            point(4, 8.0863, 98.9063),
        ]
    }

    #[test]
    fn test_world_pixel_origin() {
        let (x, y) = world_pixel(0.0, 0.0, 0);
        assert!((x - 128.0).abs() < 1e-9);
        assert!((y - 128.0).abs() < 1e-9);

        // Poles are clamped instead of going to infinity
        let (_, y) = world_pixel(90.0, 0.0, 3);
        assert!(y.is_finite());
    }

    #[test]
    fn test_country_zoom_clusters_nearby_points() {
        let markers = MarkerClusterer::default().cluster(&sample(), 6);

        assert_eq!(markers.len(), 2);
        let cluster = markers.iter().find(|m| m.kind == MarkerKind::Cluster).unwrap();
        assert_eq!(cluster.count, 3);
        assert!(cluster.campsite_id.is_none());
        assert!(cluster.expansion_zoom.unwrap() > 6);

        let [west, south, east, north] = cluster.bounds.unwrap();
        assert!(west <= cluster.longitude && cluster.longitude <= east);
        assert!(south <= cluster.latitude && cluster.latitude <= north);

        let single = markers.iter().find(|m| m.kind == MarkerKind::Point).unwrap();
        assert_eq!(single.campsite_id, Some(Uuid::from_u128(4)));
    }

    #[test]
    fn test_counts_are_conserved() {
        let points = sample();
        for zoom in 0..=MAX_MAP_ZOOM {
            let markers = MarkerClusterer::default().cluster(&points, zoom);
            let total: usize = markers.iter().map(|m| m.count).sum();
            assert_eq!(total, points.len(), "zoom {}", zoom);
        }
    }

    #[test]
    fn test_markers_split_as_zoom_increases() {
        let clusterer = MarkerClusterer::default();
        let points = sample();
        let mut previous = 0;
        for zoom in 0..=clusterer.max_zoom {
            let count = clusterer.cluster(&points, zoom).len();
            assert!(count >= previous, "zoom {} merged markers", zoom);
            previous = count;
        }
        assert_eq!(previous, points.len());
    }

    #[test]
    fn test_expansion_zoom_splits_cluster() {
        let clusterer = MarkerClusterer::default();
        let points = sample();
        let markers = clusterer.cluster(&points, 5);
        let cluster = markers.iter().find(|m| m.kind == MarkerKind::Cluster).unwrap();
        let expansion = cluster.expansion_zoom.unwrap();

        let at_expansion = clusterer.cluster(&points[..3], expansion);
        assert!(at_expansion.len() > 1);
    }

    #[test]
    fn test_max_zoom_never_clusters() {
        let clusterer = MarkerClusterer::new(60.0, 10);
        let same_spot = vec![point(2, 13.75, 100.5), point(1, 13.75, 100.5)];

        let markers = clusterer.cluster(&same_spot, 10);
        assert_eq!(markers.len(), 2);
        assert!(markers.iter().all(|m| m.kind == MarkerKind::Point));
        // Ordered by id within a cell
        assert_eq!(markers[0].campsite_id, Some(Uuid::from_u128(1)));

        // Identical coordinates only split at max zoom
        let markers = clusterer.cluster(&same_spot, 4);
        assert_eq!(markers[0].expansion_zoom, Some(10));
    }

    #[test]
    fn test_empty_input() {
        assert!(MarkerClusterer::default().cluster(&[], 8).is_empty());
    }

    #[test]
    fn test_feature_collection() {
        let markers = MarkerClusterer::default().cluster(&sample(), 6);
        let collection = to_feature_collection(&markers);
        assert_eq!(collection.features.len(), 2);

        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        let coordinates = &value["features"][0]["geometry"]["coordinates"];
        assert!(coordinates[0].as_f64().unwrap() > 90.0);
    }
}
