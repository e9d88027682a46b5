// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod attraction_repository;
pub mod campsite_repository;
pub mod dashboard_repository;
pub mod inquiry_repository;
pub mod owner_request_repository;
pub mod profile_repository;
pub mod province_repository;
pub mod review_repository;
pub mod wishlist_repository;

pub use attraction_repository::*;
pub use campsite_repository::*;
pub use dashboard_repository::*;
pub use inquiry_repository::*;
pub use owner_request_repository::*;
pub use profile_repository::*;
pub use province_repository::*;
pub use review_repository::*;
pub use wishlist_repository::*;
