// src/models/search.rs
// DOCUMENTATION: Query-string and response DTOs for the search page

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CampsiteCard;

/// Raw search query parameters
/// DOCUMENTATION: Parsed by actix from the query string, then normalized
/// into `SearchFilters`. Lists are comma separated (`type=camping,glamping`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Free text over name, description and address
    pub q: Option<String>,

    /// Province slug
    pub province: Option<String>,

    /// Campsite types, comma separated
    #[serde(rename = "type")]
    pub types: Option<String>,

    /// Price per night in THB
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,

    /// Amenity slugs, comma separated; all must be present
    pub amenities: Option<String>,

    pub sort: Option<String>,

    /// Page number (1-based)
    pub page: Option<i64>,

    /// Results per page (max 50)
    pub limit: Option<i64>,

    /// Visible map viewport
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,
}

/// Paginated search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub data: Vec<CampsiteCard>,

    /// Total number of matches (regardless of pagination)
    pub total_count: i64,

    pub page: i64,

    pub limit: i64,

    pub has_more: bool,

    /// Canonical query string for the browser URL
    pub query_string: String,

    /// Number of active filters, for the filter button badge
    pub active_filters: usize,
}

/// Extra parameters of GET /api/search/markers
#[derive(Debug, Clone, Deserialize)]
pub struct MarkersParams {
    pub zoom: Option<u8>,
    pub format: Option<String>,
}

/// GET /api/campsites/compare?ids=a,b,c
#[derive(Debug, Clone, Deserialize)]
pub struct CompareQuery {
    pub ids: String,
}

/// Page/limit pair used by listing endpoints other than search
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Returns (page, limit, offset) with page >= 1 and 1 <= limit <= max
    pub fn resolve(&self, default_limit: i64, max_limit: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, max_limit);
        (page, limit, (page - 1) * limit)
    }
}

/// Response for wishlist toggle and membership checks
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct WishlistState {
    pub campsite_id: Uuid,
    pub wishlisted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_resolve() {
        let q = PageQuery { page: Some(3), limit: Some(10) };
        assert_eq!(q.resolve(20, 50), (3, 10, 20));

        let q = PageQuery { page: Some(0), limit: Some(500) };
        assert_eq!(q.resolve(20, 50), (1, 50, 0));

        assert_eq!(PageQuery::default().resolve(20, 50), (1, 20, 0));
    }
}
