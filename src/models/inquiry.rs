// src/models/inquiry.rs
// DOCUMENTATION: Guest inquiries sent to campsite owners

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validation::validate_thai_phone;

/// Owner-side handling state (`inquiry_status` enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "inquiry_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    New,
    Read,
    Replied,
    Closed,
}

impl InquiryStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(InquiryStatus::New),
            "read" => Some(InquiryStatus::Read),
            "replied" => Some(InquiryStatus::Replied),
            "closed" => Some(InquiryStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Inquiry {
    pub id: Uuid,
    pub campsite_id: Uuid,
    pub user_id: Option<Uuid>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub message: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: Option<i32>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inquiry with the campsite name for the owner inbox
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InquiryWithCampsite {
    pub id: Uuid,
    pub campsite_id: Uuid,
    pub campsite_name: String,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub message: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: Option<i32>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

/// POST /api/campsites/{id}/inquiries
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_stay_dates"))]
pub struct CreateInquiryRequest {
    #[validate(length(min = 1, max = 120))]
    pub guest_name: String,

    #[validate(email)]
    pub guest_email: String,

    #[validate(custom = "validate_thai_phone")]
    pub guest_phone: String,

    #[validate(length(min = 10, max = 2000))]
    pub message: String,

    pub check_in: Option<NaiveDate>,

    pub check_out: Option<NaiveDate>,

    #[validate(range(min = 1, max = 100))]
    pub guests: Option<i32>,
}

fn validate_stay_dates(req: &CreateInquiryRequest) -> Result<(), ValidationError> {
    check_stay_dates(req.check_in, req.check_out, Utc::now().date_naive())
}

/// Check-out must follow check-in and check-in cannot be in the past
pub fn check_stay_dates(
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if let Some(check_in) = check_in {
        if check_in < today {
            let mut err = ValidationError::new("check_in_past");
            err.message = Some("check_in cannot be in the past".into());
            return Err(err);
        }
    }

    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) if check_out <= check_in => {
            let mut err = ValidationError::new("stay_dates");
            err.message = Some("check_out must be after check_in".into());
            Err(err)
        }
        (None, Some(_)) => {
            let mut err = ValidationError::new("stay_dates");
            err.message = Some("check_out requires check_in".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInquiryStatusRequest {
    pub status: InquiryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_stay_dates() {
        let today = date(2025, 1, 10);
        assert!(check_stay_dates(None, None, today).is_ok());
        assert!(check_stay_dates(Some(date(2025, 1, 12)), Some(date(2025, 1, 14)), today).is_ok());
        assert!(check_stay_dates(Some(date(2025, 1, 12)), Some(date(2025, 1, 12)), today).is_err());
        assert!(check_stay_dates(Some(date(2025, 1, 9)), None, today).is_err());
        assert!(check_stay_dates(None, Some(date(2025, 1, 14)), today).is_err());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(InquiryStatus::parse("replied"), Some(InquiryStatus::Replied));
        assert_eq!(InquiryStatus::parse("archived"), None);
    }
}
