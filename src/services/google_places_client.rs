// src/services/google_places_client.rs
// DOCUMENTATION: Google Places API client
// PURPOSE: Live lookup of tourist attractions around a campsite when the
// attractions table has nothing for that area.

use crate::errors::CampingError;
use crate::models::NearbyAttraction;
use crate::services::geo::haversine_km;
use crate::services::ResponseCache;
use geo_types::Point;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Nearby Search caps the radius at 50 km
const MAX_RADIUS_M: u32 = 50_000;

/// Google Places API client
/// DOCUMENTATION: Handles authentication, API calls and response caching
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
    cache: Option<Arc<ResponseCache>>,
}

/// Response from Google Places Nearby Search
#[derive(Debug, Deserialize, Serialize)]
pub struct GooglePlacesResponse {
    pub results: Vec<GooglePlace>,
    pub status: String,
    pub error_message: Option<String>,
}

/// Individual place from Google Places API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GooglePlace {
    pub place_id: String,
    pub name: String,
    /// e.g. ["tourist_attraction", "point_of_interest"]
    #[serde(default)]
    pub types: Vec<String>,
    pub geometry: GoogleGeometry,
    /// Short address
    pub vicinity: Option<String>,
    pub rating: Option<f32>,
    pub photos: Option<Vec<GooglePhoto>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleGeometry {
    pub location: GoogleLocation,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleLocation {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GooglePhoto {
    /// Photo reference (used to fetch actual photo)
    pub photo_reference: String,
}

impl GooglePlacesClient {
    /// Create new Google Places API client
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            cache: None,
        }
    }

    /// Create a client that caches results in the shared response cache
    pub fn new_with_cache(api_key: String, cache: Arc<ResponseCache>) -> Self {
        Self {
            cache: Some(cache),
            ..Self::new(api_key)
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Tourist attractions within `radius_km` of a point, nearest first
    pub async fn nearby_attractions(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<NearbyAttraction>, CampingError> {
        let cache_key = ResponseCache::attractions_key(latitude, longitude, radius_km);
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get_json::<Vec<NearbyAttraction>>(&cache_key).await {
                return Ok(cached);
            }
        }

        let radius_m = ((radius_km * 1000.0) as u32).min(MAX_RADIUS_M);
        let places = self
            .nearby_search(latitude, longitude, radius_m, "tourist_attraction")
            .await?;

        let origin = Point::new(longitude, latitude);
        let mut attractions: Vec<NearbyAttraction> = places
            .iter()
            .map(|place| self.to_nearby_attraction(place, origin))
            .filter(|a| a.distance_km <= radius_km)
            .collect();
        attractions.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        if let Some(cache) = &self.cache {
            cache.set_json(cache_key, &attractions).await;
        }

        Ok(attractions)
    }

    /// Perform nearby search for places
    /// DOCUMENTATION: Searches for places of `place_type` near a geographic point
    async fn nearby_search(
        &self,
        latitude: f64,
        longitude: f64,
        radius: u32,
        place_type: &str,
    ) -> Result<Vec<GooglePlace>, CampingError> {
        if !self.is_configured() {
            return Err(CampingError::ExternalApiError(
                "Google Places API key not configured".to_string(),
            ));
        }

        let url = format!("{}/nearbysearch/json", self.base_url);
        let location = format!("{},{}", latitude, longitude);
        let radius = radius.to_string();
        let params = [
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("type", place_type),
            ("language", "th"),
            ("key", self.api_key.as_str()),
        ];

        log::debug!(
            "Google Places nearby search: lat={}, lng={}, radius={}",
            latitude,
            longitude,
            radius
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Google Places API request failed: {}", e);
                CampingError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            log::error!("Google Places API error {}", status);
            return Err(CampingError::ExternalApiError(format!("API error {}", status)));
        }

        let api_response: GooglePlacesResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Google Places response: {}", e);
            CampingError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        Self::check_status(api_response)
    }

    fn check_status(api_response: GooglePlacesResponse) -> Result<Vec<GooglePlace>, CampingError> {
        match api_response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {
                log::info!(
                    "Google Places search returned {} results",
                    api_response.results.len()
                );
                Ok(api_response.results)
            }
            "OVER_QUERY_LIMIT" => {
                log::error!("Google Places API quota exceeded");
                Err(CampingError::ExternalApiError("quota exceeded".to_string()))
            }
            other => {
                let msg = api_response
                    .error_message
                    .unwrap_or_else(|| format!("Unknown status: {}", other));
                log::error!("Google Places API unexpected status: {}", msg);
                Err(CampingError::ExternalApiError(msg))
            }
        }
    }

    /// Photo URL for a photo reference
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        format!(
            "{}/photo?maxwidth={}&photoreference={}&key={}",
            self.base_url, max_width, photo_reference, self.api_key
        )
    }

    fn to_nearby_attraction(&self, place: &GooglePlace, origin: Point<f64>) -> NearbyAttraction {
        let position = Point::new(place.geometry.location.lng, place.geometry.location.lat);
        let distance = haversine_km(origin, position);

        NearbyAttraction {
            id: place.place_id.clone(),
            name: place.name.clone(),
            category: map_google_type_to_category(&place.types).to_string(),
            description: place.vicinity.clone(),
            image_url: place
                .photos
                .as_ref()
                .and_then(|photos| photos.first())
                .map(|photo| self.photo_url(&photo.photo_reference, 400)),
            latitude: place.geometry.location.lat,
            longitude: place.geometry.location.lng,
            distance_km: (distance * 10.0).round() / 10.0,
            rating: place.rating,
            source: "google".to_string(),
        }
    }
}

/// Map Google place types onto the attraction categories used by the site
pub fn map_google_type_to_category(types: &[String]) -> &'static str {
    let has = |t: &str| types.iter().any(|x| x == t);

    if has("natural_feature") {
        "nature"
    } else if has("park") || has("campground") {
        "park"
    } else if has("hindu_temple") || has("place_of_worship") {
        "temple"
    } else if has("museum") || has("art_gallery") {
        "museum"
    } else if has("zoo") || has("aquarium") {
        "wildlife"
    } else {
        "attraction"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(types: &[&str], lat: f64, lng: f64) -> GooglePlace {
        GooglePlace {
            place_id: "ChIJ123".to_string(),
            name: "Wachirathan Falls".to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            geometry: GoogleGeometry {
                location: GoogleLocation { lat, lng },
            },
            vicinity: Some("Ban Luang, Chom Thong".to_string()),
            rating: Some(4.7),
            photos: Some(vec![GooglePhoto {
                photo_reference: "ref-1".to_string(),
            }]),
        }
    }

    #[test]
    fn test_type_mapping() {
        let types = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(map_google_type_to_category(&types(&["natural_feature", "tourist_attraction"])), "nature");
        assert_eq!(map_google_type_to_category(&types(&["place_of_worship"])), "temple");
        assert_eq!(map_google_type_to_category(&types(&["tourist_attraction"])), "attraction");
    }

    #[test]
    fn test_to_nearby_attraction() {
        let client = GooglePlacesClient::new("test_key".to_string());
        let origin = Point::new(98.4870, 18.5880);
        let attraction =
            client.to_nearby_attraction(&place(&["natural_feature"], 18.5355, 98.5990), origin);

        assert_eq!(attraction.id, "ChIJ123");
        assert_eq!(attraction.category, "nature");
        assert_eq!(attraction.source, "google");
        assert!(attraction.distance_km > 10.0 && attraction.distance_km < 15.0);
        assert!(attraction.image_url.unwrap().contains("photoreference=ref-1"));
    }

    #[test]
    fn test_check_status() {
        let ok = GooglePlacesResponse {
            results: vec![place(&[], 0.0, 0.0)],
            status: "OK".to_string(),
            error_message: None,
        };
        assert_eq!(GooglePlacesClient::check_status(ok).unwrap().len(), 1);

        let denied = GooglePlacesResponse {
            results: vec![],
            status: "REQUEST_DENIED".to_string(),
            error_message: Some("bad key".to_string()),
        };
        assert!(matches!(
            GooglePlacesClient::check_status(denied),
            Err(CampingError::ExternalApiError(msg)) if msg == "bad key"
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_client_errors() {
        let client = GooglePlacesClient::new(String::new());
        let result = client.nearby_attractions(18.5, 98.5, 10.0).await;
        assert!(matches!(result, Err(CampingError::ExternalApiError(_))));
    }
}
