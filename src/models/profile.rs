// src/models/profile.rs
// DOCUMENTATION: Accounts and auth request DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_thai_phone;

/// Account role, stored as the `user_role` Postgres enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Owner,
    Admin,
}

impl UserRole {
    /// Owners and admins may manage listings
    pub fn can_manage_listings(&self) -> bool {
        matches!(self, UserRole::Owner | UserRole::Admin)
    }
}

/// Row of the profiles table
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a profile, never includes the password hash
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn to_response(&self) -> ProfileResponse {
        ProfileResponse {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            avatar_url: self.avatar_url.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// POST /api/auth/signup
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 120))]
    pub full_name: String,

    #[validate(custom = "validate_thai_phone")]
    pub phone: Option<String>,
}

/// POST /api/auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// PUT /api/profile
/// Only provided fields are updated
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: Option<String>,

    #[validate(custom = "validate_thai_phone")]
    pub phone: Option<String>,

    #[validate(url)]
    pub avatar_url: Option<String>,
}

/// Body returned by signup/login/refresh; tokens travel in cookies
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub profile: ProfileResponse,
    pub access_token_expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_validation() {
        let req = SignupRequest {
            email: "camper@example.com".to_string(),
            password: "long-enough".to_string(),
            full_name: "Somchai".to_string(),
            phone: Some("081-234-5678".to_string()),
        };
        assert!(req.validate().is_ok());

        let bad_phone = SignupRequest {
            phone: Some("12345".to_string()),
            ..req
        };
        assert!(bad_phone.validate().is_err());
    }

    #[test]
    fn test_signup_short_password() {
        let req = SignupRequest {
            email: "camper@example.com".to_string(),
            password: "short".to_string(),
            full_name: "Somchai".to_string(),
            phone: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.can_manage_listings());
        assert!(UserRole::Owner.can_manage_listings());
        assert!(!UserRole::User.can_manage_listings());
    }
}
