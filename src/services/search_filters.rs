// src/services/search_filters.rs
// DOCUMENTATION: Search filter normalization and URL-state encoding
// PURPOSE: Turn the raw query string of the search page into a validated
// filter set, and back into the canonical query string the client keeps in
// the browser URL.

use crate::errors::CampingError;
use crate::models::{CampsiteType, SearchQuery};
use std::fmt;
use url::form_urlencoded;

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 50;
pub const MAX_QUERY_CHARS: usize = 100;
/// Deepest page a client may request; keeps OFFSET arithmetic in range
pub const MAX_PAGE: i64 = 10_000;
const MAX_LIST_ITEMS: usize = 20;

/// Result ordering on the search page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Rating weighted by review volume
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
    Rating,
    Newest,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Recommended => "recommended",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::Rating => "rating",
            SortOrder::Newest => "newest",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "recommended" => Some(SortOrder::Recommended),
            "price_asc" => Some(SortOrder::PriceAsc),
            "price_desc" => Some(SortOrder::PriceDesc),
            "rating" => Some(SortOrder::Rating),
            "newest" => Some(SortOrder::Newest),
            _ => None,
        }
    }

    /// ORDER BY clause over the `c` campsites alias; ties broken by id
    pub fn order_by_sql(&self) -> &'static str {
        match self {
            SortOrder::Recommended => {
                "c.average_rating * LN(c.review_count + 2) DESC, c.review_count DESC, c.id"
            }
            SortOrder::PriceAsc => "c.price_per_night ASC, c.id",
            SortOrder::PriceDesc => "c.price_per_night DESC, c.id",
            SortOrder::Rating => "c.average_rating DESC, c.review_count DESC, c.id",
            SortOrder::Newest => "c.created_at DESC, c.id",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visible map viewport. `west > east` means the box crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl MapBounds {
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }
}

/// Normalized, validated search filters
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    pub q: Option<String>,
    pub province: Option<String>,
    /// Any of these types (sorted, unique)
    pub types: Vec<CampsiteType>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// All of these amenities (sorted, unique)
    pub amenities: Vec<String>,
    pub sort: SortOrder,
    pub page: i64,
    pub limit: i64,
    pub bounds: Option<MapBounds>,
}

impl Default for SearchFilters {
    fn default() -> Self {
        SearchFilters {
            q: None,
            province: None,
            types: Vec::new(),
            min_price: None,
            max_price: None,
            amenities: Vec::new(),
            sort: SortOrder::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            bounds: None,
        }
    }
}

impl SearchFilters {
    /// Normalize and validate raw query parameters
    pub fn from_query(query: &SearchQuery) -> Result<Self, CampingError> {
        let q = non_empty(query.q.as_deref()).map(|s| collapse_whitespace(&s));
        if let Some(text) = &q {
            if text.chars().count() > MAX_QUERY_CHARS {
                return Err(CampingError::InvalidInput(format!(
                    "q must be at most {} characters",
                    MAX_QUERY_CHARS
                )));
            }
        }

        let province = match non_empty(query.province.as_deref()) {
            Some(slug) => Some(parse_slug("province", &slug)?),
            None => None,
        };

        let mut types = Vec::new();
        for raw in split_list(query.types.as_deref()) {
            let t = raw
                .parse::<CampsiteType>()
                .map_err(CampingError::InvalidInput)?;
            types.push(t);
        }
        types.sort();
        types.dedup();

        let mut amenities = Vec::new();
        for raw in split_list(query.amenities.as_deref()) {
            amenities.push(parse_slug("amenities", &raw)?);
        }
        amenities.sort();
        amenities.dedup();

        if types.len() > MAX_LIST_ITEMS || amenities.len() > MAX_LIST_ITEMS {
            return Err(CampingError::InvalidInput("too many filter values".to_string()));
        }

        for (name, value) in [("min_price", query.min_price), ("max_price", query.max_price)] {
            if matches!(value, Some(v) if v < 0) {
                return Err(CampingError::InvalidInput(format!("{} must not be negative", name)));
            }
        }
        if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
            if min > max {
                return Err(CampingError::InvalidInput(
                    "min_price must not exceed max_price".to_string(),
                ));
            }
        }

        let sort = match non_empty(query.sort.as_deref()) {
            Some(raw) => SortOrder::parse(&raw.to_lowercase()).ok_or_else(|| {
                CampingError::InvalidInput(format!("unknown sort '{}'", raw))
            })?,
            None => SortOrder::default(),
        };

        let page = query.page.unwrap_or(1);
        if !(1..=MAX_PAGE).contains(&page) {
            return Err(CampingError::InvalidInput(format!(
                "page must be between 1 and {}",
                MAX_PAGE
            )));
        }

        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(CampingError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let bounds = parse_bounds(query)?;

        Ok(SearchFilters {
            q,
            province,
            types,
            min_price: query.min_price,
            max_price: query.max_price,
            amenities,
            sort,
            page,
            limit,
            bounds,
        })
    }

    /// Parse a browser query string (with or without the leading `?`)
    pub fn parse_query_string(raw: &str) -> Result<Self, CampingError> {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut query = SearchQuery::default();

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "q" => query.q = Some(value),
                "province" => query.province = Some(value),
                "type" => query.types = Some(value),
                "amenities" => query.amenities = Some(value),
                "sort" => query.sort = Some(value),
                "min_price" => query.min_price = Some(parse_number(&key, &value)?),
                "max_price" => query.max_price = Some(parse_number(&key, &value)?),
                "page" => query.page = Some(parse_number(&key, &value)?),
                "limit" => query.limit = Some(parse_number(&key, &value)?),
                "north" => query.north = Some(parse_number(&key, &value)?),
                "south" => query.south = Some(parse_number(&key, &value)?),
                "east" => query.east = Some(parse_number(&key, &value)?),
                "west" => query.west = Some(parse_number(&key, &value)?),
                // Unrelated client state (e.g. selected marker) is ignored
                _ => {}
            }
        }

        Self::from_query(&query)
    }

    /// Canonical URL state: fixed key order, defaults omitted
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());

        if let Some(q) = &self.q {
            out.append_pair("q", q);
        }
        if let Some(province) = &self.province {
            out.append_pair("province", province);
        }
        if !self.types.is_empty() {
            let joined: Vec<&str> = self.types.iter().map(|t| t.as_str()).collect();
            out.append_pair("type", &joined.join(","));
        }
        if let Some(min) = self.min_price {
            out.append_pair("min_price", &min.to_string());
        }
        if let Some(max) = self.max_price {
            out.append_pair("max_price", &max.to_string());
        }
        if !self.amenities.is_empty() {
            out.append_pair("amenities", &self.amenities.join(","));
        }
        if self.sort != SortOrder::default() {
            out.append_pair("sort", self.sort.as_str());
        }
        if self.page != 1 {
            out.append_pair("page", &self.page.to_string());
        }
        if self.limit != DEFAULT_PAGE_SIZE {
            out.append_pair("limit", &self.limit.to_string());
        }
        if let Some(b) = &self.bounds {
            out.append_pair("north", &b.north.to_string());
            out.append_pair("south", &b.south.to_string());
            out.append_pair("east", &b.east.to_string());
            out.append_pair("west", &b.west.to_string());
        }

        out.finish()
    }

    /// Filters shown on the filter button badge (text query and paging excluded)
    pub fn active_filter_count(&self) -> usize {
        let mut count = 0;
        if self.province.is_some() {
            count += 1;
        }
        if !self.types.is_empty() {
            count += 1;
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            count += 1;
        }
        if !self.amenities.is_empty() {
            count += 1;
        }
        count
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or("")
        .split(',')
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

fn parse_slug(field: &str, raw: &str) -> Result<String, CampingError> {
    let slug = raw.trim().to_lowercase();
    let valid = !slug.is_empty()
        && slug.len() <= 64
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(slug)
    } else {
        Err(CampingError::InvalidInput(format!("invalid {} value '{}'", field, raw)))
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CampingError> {
    value
        .trim()
        .parse()
        .map_err(|_| CampingError::InvalidInput(format!("{} must be a number", key)))
}

fn parse_bounds(query: &SearchQuery) -> Result<Option<MapBounds>, CampingError> {
    match (query.north, query.south, query.east, query.west) {
        (None, None, None, None) => Ok(None),
        (Some(north), Some(south), Some(east), Some(west)) => {
            for lat in [north, south] {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(CampingError::InvalidInput(
                        "latitude bounds must be within [-90, 90]".to_string(),
                    ));
                }
            }
            for lng in [east, west] {
                if !(-180.0..=180.0).contains(&lng) {
                    return Err(CampingError::InvalidInput(
                        "longitude bounds must be within [-180, 180]".to_string(),
                    ));
                }
            }
            if south > north {
                return Err(CampingError::InvalidInput(
                    "south must not exceed north".to_string(),
                ));
            }
            Ok(Some(MapBounds { north, south, east, west }))
        }
        _ => Err(CampingError::InvalidInput(
            "north, south, east and west must be given together".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> SearchQuery {
        SearchQuery::default()
    }

    #[test]
    fn test_defaults() {
        let filters = SearchFilters::from_query(&query()).unwrap();
        assert_eq!(filters, SearchFilters::default());
        assert_eq!(filters.to_query_string(), "");
        assert_eq!(filters.active_filter_count(), 0);
    }

    #[test]
    fn test_lists_are_normalized() {
        let q = SearchQuery {
            types: Some(" Glamping,camping,,glamping ".to_string()),
            amenities: Some("wifi, Toilet ,wifi".to_string()),
            ..query()
        };
        let filters = SearchFilters::from_query(&q).unwrap();
        assert_eq!(filters.types, vec![CampsiteType::Camping, CampsiteType::Glamping]);
        assert_eq!(filters.amenities, vec!["toilet".to_string(), "wifi".to_string()]);
        assert_eq!(filters.active_filter_count(), 2);
    }

    #[test]
    fn test_amenities_count_once_on_badge() {
        let filters = SearchFilters::parse_query_string("amenities=wifi,toilet,shower").unwrap();
        assert_eq!(filters.active_filter_count(), 1);

        let filters =
            SearchFilters::parse_query_string("province=krabi&type=camping&min_price=300&amenities=wifi,toilet")
                .unwrap();
        assert_eq!(filters.active_filter_count(), 4);
    }

    #[test]
    fn test_invalid_queries_rejected() {
        let cases = vec![
            SearchQuery { types: Some("hotel".into()), ..query() },
            SearchQuery { min_price: Some(-1), ..query() },
            SearchQuery { min_price: Some(900), max_price: Some(100), ..query() },
            SearchQuery { sort: Some("cheapest".into()), ..query() },
            SearchQuery { page: Some(0), ..query() },
            SearchQuery { limit: Some(51), ..query() },
            SearchQuery { province: Some("chiang mai".into()), ..query() },
            SearchQuery { north: Some(20.0), ..query() },
            SearchQuery {
                north: Some(10.0),
                south: Some(20.0),
                east: Some(101.0),
                west: Some(99.0),
                ..query()
            },
            SearchQuery { q: Some("x".repeat(MAX_QUERY_CHARS + 1)), ..query() },
        ];

        for case in cases {
            let result = SearchFilters::from_query(&case);
            assert!(
                matches!(result, Err(CampingError::InvalidInput(_))),
                "expected rejection for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_canonical_query_string() {
        let q = SearchQuery {
            q: Some("  river   view ".into()),
            province: Some("Chiang-Mai".into()),
            types: Some("glamping,camping".into()),
            min_price: Some(200),
            max_price: Some(1500),
            amenities: Some("wifi,toilet".into()),
            sort: Some("price_asc".into()),
            page: Some(2),
            ..query()
        };
        let filters = SearchFilters::from_query(&q).unwrap();
        assert_eq!(
            filters.to_query_string(),
            "q=river+view&province=chiang-mai&type=camping%2Cglamping&min_price=200\
             &max_price=1500&amenities=toilet%2Cwifi&sort=price_asc&page=2"
        );
    }

    #[test]
    fn test_query_string_round_trip() {
        let raw = "?q=%E0%B8%A0%E0%B8%B9%E0%B9%80%E0%B8%82%E0%B8%B2&province=loei\
                   &type=caravan,bungalow&max_price=800&amenities=shower\
                   &sort=rating&limit=24&north=18.5&south=17.0&east=102.1&west=100.9";
        let filters = SearchFilters::parse_query_string(raw).unwrap();
        assert_eq!(filters.q.as_deref(), Some("ภูเขา"));
        assert_eq!(filters.limit, 24);
        assert!(filters.bounds.is_some());

        let reparsed = SearchFilters::parse_query_string(&filters.to_query_string()).unwrap();
        assert_eq!(reparsed, filters);
    }

    #[test]
    fn test_parse_query_string_rejects_bad_numbers() {
        let result = SearchFilters::parse_query_string("min_price=cheap");
        assert!(matches!(result, Err(CampingError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let filters = SearchFilters::parse_query_string("selected=abc&province=krabi").unwrap();
        assert_eq!(filters.province.as_deref(), Some("krabi"));
    }

    #[test]
    fn test_offset() {
        let filters = SearchFilters::parse_query_string("page=4&limit=10").unwrap();
        assert_eq!(filters.offset(), 30);

        let deepest = format!("page={}&limit={}", MAX_PAGE, MAX_PAGE_SIZE);
        let filters = SearchFilters::parse_query_string(&deepest).unwrap();
        assert_eq!(filters.offset(), (MAX_PAGE - 1) * MAX_PAGE_SIZE);
    }

    #[test]
    fn test_huge_page_rejected() {
        for raw in ["page=9223372036854775807", "page=10001"] {
            assert!(matches!(
                SearchFilters::parse_query_string(raw),
                Err(CampingError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_bounds_across_antimeridian() {
        let thailand = MapBounds { north: 20.5, south: 5.6, east: 105.7, west: 97.3 };
        assert!(!thailand.crosses_antimeridian());

        let pacific = MapBounds { north: 10.0, south: -10.0, east: -170.0, west: 170.0 };
        assert!(pacific.crosses_antimeridian());
    }
}
