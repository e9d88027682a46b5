// src/models/attraction.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Point of interest near campsites
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attraction {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Attraction as returned by GET /api/campsites/{id}/attractions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyAttraction {
    /// Database id, or the Google place id for live results
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
    pub rating: Option<f32>,
    /// "local" or "google"
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct AttractionsResponse {
    pub campsite_id: Uuid,
    pub radius_km: f64,
    pub attractions: Vec<NearbyAttraction>,
}
