// src/models/province.rs
// DOCUMENTATION: Reference data: provinces and the amenity catalog

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Thai province (changwat)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Province {
    pub id: i32,
    pub slug: String,
    pub name_en: String,
    pub name_th: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Province with the number of publicly visible campsites
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProvinceWithCount {
    pub id: i32,
    pub slug: String,
    pub name_en: String,
    pub name_th: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub campsite_count: i64,
}

/// Compact province reference embedded in campsite payloads
#[derive(Debug, Clone, Serialize)]
pub struct ProvinceRef {
    pub slug: String,
    pub name_en: String,
    pub name_th: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Amenity {
    pub id: i32,
    pub slug: String,
    pub name_en: String,
    pub name_th: String,
    pub icon: Option<String>,
}
