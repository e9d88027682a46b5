// src/models/campsite.rs
// DOCUMENTATION: Core data structures for campsites
// PURPOSE: Database rows, listing cards, detail payloads and owner DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::{Amenity, ProvinceRef, ReviewWithAuthor};
use crate::validation::{validate_clock_time, validate_thai_phone};

/// Kind of accommodation, stored as the `campsite_type` Postgres enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "campsite_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampsiteType {
    Camping,
    Glamping,
    Bungalow,
    Caravan,
}

impl CampsiteType {
    pub const ALL: [CampsiteType; 4] = [
        CampsiteType::Camping,
        CampsiteType::Glamping,
        CampsiteType::Bungalow,
        CampsiteType::Caravan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampsiteType::Camping => "camping",
            CampsiteType::Glamping => "glamping",
            CampsiteType::Bungalow => "bungalow",
            CampsiteType::Caravan => "caravan",
        }
    }
}

impl fmt::Display for CampsiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampsiteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CampsiteType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown campsite type '{}'", s))
    }
}

/// Moderation state of listings and owner requests (`approval_status` enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "approval_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }
}

/// Represents a complete campsite record from the database
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Campsite {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub province_id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub campsite_type: CampsiteType,
    pub status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    pub price_per_night: i32,
    pub max_guests: Option<i32>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub average_rating: f32,
    pub review_count: i32,
    pub view_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campsite {
    /// Visible on search, detail and compare pages
    pub fn is_public(&self) -> bool {
        self.is_active && self.status == ApprovalStatus::Approved
    }
}

/// Listing card used by search results, wishlist and owner listings
/// DOCUMENTATION: Joined with province and the primary image
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CampsiteCard {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub campsite_type: CampsiteType,
    pub status: ApprovalStatus,
    pub price_per_night: i32,
    pub average_rating: f32,
    pub review_count: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub province_slug: String,
    pub province_name_en: String,
    pub province_name_th: String,
    pub primary_image_url: Option<String>,
    pub amenity_slugs: Vec<String>,
}

/// Minimal row for map markers
#[derive(Debug, Clone, FromRow)]
pub struct CampsitePoint {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CampsiteImage {
    pub id: Uuid,
    pub campsite_id: Uuid,
    pub url: String,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Star histogram shown on the detail page
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RatingSummary {
    pub average: f32,
    pub count: i64,
    /// Index 0 holds 1-star reviews, index 4 holds 5-star reviews
    pub histogram: [i64; 5],
}

impl RatingSummary {
    /// Build from (rating, count) rows
    pub fn from_counts(rows: &[(i16, i64)]) -> Self {
        let mut summary = RatingSummary::default();
        let mut total_stars = 0i64;

        for &(rating, count) in rows {
            if !(1..=5).contains(&rating) {
                continue;
            }
            summary.histogram[(rating - 1) as usize] += count;
            summary.count += count;
            total_stars += rating as i64 * count;
        }

        if summary.count > 0 {
            let avg = total_stars as f64 / summary.count as f64;
            summary.average = ((avg * 10.0).round() / 10.0) as f32;
        }
        summary
    }
}

/// Owner contact block on the detail page
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OwnerContact {
    pub id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

/// Detailed response DTO for GET /api/campsites/{id}
#[derive(Debug, Serialize)]
pub struct CampsiteDetail {
    #[serde(flatten)]
    pub campsite: Campsite,
    pub province: ProvinceRef,
    pub amenities: Vec<Amenity>,
    pub images: Vec<CampsiteImage>,
    pub rating: RatingSummary,
    pub recent_reviews: Vec<ReviewWithAuthor>,
    pub owner: OwnerContact,
}

/// Request DTO for creating a listing from the owner dashboard
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCampsiteRequest {
    #[validate(length(min = 3, max = 150))]
    pub name: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub campsite_type: CampsiteType,

    /// Province slug
    #[validate(length(min = 1))]
    pub province: String,

    #[validate(range(min = 0, max = 1_000_000))]
    pub price_per_night: i32,

    #[validate(range(min = 1, max = 1000))]
    pub max_guests: Option<i32>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[validate(custom = "validate_thai_phone")]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(url)]
    pub website: Option<String>,

    #[validate(custom = "validate_clock_time")]
    pub check_in_time: Option<String>,

    #[validate(custom = "validate_clock_time")]
    pub check_out_time: Option<String>,

    /// Amenity slugs
    #[serde(default)]
    pub amenities: Vec<String>,
}

/// Request DTO for updating a listing
/// All fields are optional - only provided fields are updated
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCampsiteRequest {
    #[validate(length(min = 3, max = 150))]
    pub name: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub campsite_type: Option<CampsiteType>,

    pub province: Option<String>,

    #[validate(range(min = 0, max = 1_000_000))]
    pub price_per_night: Option<i32>,

    #[validate(range(min = 1, max = 1000))]
    pub max_guests: Option<i32>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[validate(custom = "validate_thai_phone")]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(url)]
    pub website: Option<String>,

    #[validate(custom = "validate_clock_time")]
    pub check_in_time: Option<String>,

    #[validate(custom = "validate_clock_time")]
    pub check_out_time: Option<String>,

    /// Replaces the amenity set when present
    pub amenities: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateImageRequest {
    #[validate(url)]
    pub url: String,

    #[validate(length(max = 200))]
    pub alt_text: Option<String>,

    #[serde(default)]
    pub is_primary: bool,
}

/// POST /api/admin/campsites/{id}/reject
#[derive(Debug, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campsite_type_from_str() {
        assert_eq!("glamping".parse::<CampsiteType>(), Ok(CampsiteType::Glamping));
        assert!("hotel".parse::<CampsiteType>().is_err());
        assert_eq!(CampsiteType::Caravan.to_string(), "caravan");
    }

    #[test]
    fn test_rating_summary() {
        let summary = RatingSummary::from_counts(&[(5, 3), (4, 1), (1, 1)]);
        assert_eq!(summary.count, 5);
        assert_eq!(summary.histogram, [1, 0, 0, 1, 3]);
        // (15 + 4 + 1) / 5
        assert_eq!(summary.average, 4.0);
    }

    #[test]
    fn test_rating_summary_empty() {
        let summary = RatingSummary::from_counts(&[]);
        assert_eq!(summary, RatingSummary::default());
    }

    #[test]
    fn test_create_request_rejects_bad_coordinates() {
        let req = CreateCampsiteRequest {
            name: "Khao Yai Riverside".to_string(),
            description: None,
            campsite_type: CampsiteType::Camping,
            province: "nakhon-ratchasima".to_string(),
            price_per_night: 350,
            max_guests: Some(4),
            latitude: 14.43,
            longitude: 101.37,
            address: None,
            phone: Some("0812345678".to_string()),
            email: None,
            website: None,
            check_in_time: Some("14:00".to_string()),
            check_out_time: Some("12:00".to_string()),
            amenities: vec!["toilet".to_string()],
        };
        assert!(req.validate().is_ok());

        let bad = CreateCampsiteRequest {
            latitude: 120.0,
            ..req
        };
        assert!(bad.validate().is_err());
    }
}
