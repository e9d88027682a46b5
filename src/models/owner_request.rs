// src/models/owner_request.rs
// DOCUMENTATION: Requests from users to become campsite owners

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::ApprovalStatus;
use crate::validation::validate_thai_phone;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OwnerRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub phone: String,
    pub description: Option<String>,
    pub status: ApprovalStatus,
    pub review_note: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Admin queue row, includes the requester's account details
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OwnerRequestWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub phone: String,
    pub description: Option<String>,
    pub status: ApprovalStatus,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_email: String,
    pub user_full_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOwnerRequest {
    #[validate(length(min = 2, max = 150))]
    pub business_name: String,

    #[validate(custom = "validate_thai_phone")]
    pub phone: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}
