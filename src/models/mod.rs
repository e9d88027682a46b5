// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod attraction;
pub mod campsite;
pub mod dashboard;
pub mod inquiry;
pub mod owner_request;
pub mod profile;
pub mod province;
pub mod review;
pub mod search;

pub use attraction::*;
pub use campsite::*;
pub use dashboard::*;
pub use inquiry::*;
pub use owner_request::*;
pub use profile::*;
pub use province::*;
pub use review::*;
pub use search::*;
