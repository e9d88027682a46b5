// src/middleware/mod.rs
// DOCUMENTATION: Request extractors shared by handlers

pub mod auth;

pub use auth::{client_ip, AuthUser, OptionalAuthUser};
