// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod auth_service;
pub mod cache;
pub mod campsite_service;
pub mod clustering;
pub mod dashboard_service;
pub mod geo;
pub mod google_places_client;
pub mod inquiry_service;
pub mod owner_request_service;
pub mod rate_limit;
pub mod review_service;
pub mod search_filters;
pub mod session;

pub use auth_service::*;
pub use cache::*;
pub use campsite_service::*;
pub use clustering::{MarkerCluster, MarkerClusterer};
pub use dashboard_service::*;
pub use google_places_client::GooglePlacesClient;
pub use inquiry_service::InquiryService;
pub use owner_request_service::*;
pub use rate_limit::LoginRateLimiter;
pub use review_service::*;
pub use search_filters::SearchFilters;
