// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Guest review of a campsite, one per (campsite, user)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub campsite_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub title: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review joined with the author's public profile fields
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewWithAuthor {
    pub id: Uuid,
    pub campsite_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub title: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
    pub author_avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,

    #[validate(length(max = 150))]
    pub title: Option<String>,

    #[validate(length(min = 10, max = 2000))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i16>,

    #[validate(length(max = 150))]
    pub title: Option<String>,

    #[validate(length(min = 10, max = 2000))]
    pub content: Option<String>,
}

/// Why a review was reported (`report_reason` enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "report_reason", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportReason {
    Spam,
    Inappropriate,
    Fake,
    Offensive,
    Other,
}

/// Moderation outcome of a report (`report_status` enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "report_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReportStatus::Pending),
            "resolved" => Some(ReportStatus::Resolved),
            "dismissed" => Some(ReportStatus::Dismissed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewReport {
    pub id: Uuid,
    /// None after the review was deleted
    pub review_id: Option<Uuid>,
    pub reporter_id: Uuid,
    pub reason: ReportReason,
    pub details: Option<String>,
    pub status: ReportStatus,
    pub resolved_by: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Report joined with the reported review for the moderation queue
/// DOCUMENTATION: Review columns are empty when the review no longer exists
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewReportWithReview {
    pub id: Uuid,
    pub review_id: Option<Uuid>,
    pub reporter_id: Uuid,
    pub reason: ReportReason,
    pub details: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub review_rating: Option<i16>,
    pub review_content: Option<String>,
    pub review_author_id: Option<Uuid>,
    pub campsite_id: Option<Uuid>,
}

/// POST /api/reviews/{id}/report
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_report_details"))]
pub struct CreateReportRequest {
    pub reason: ReportReason,

    #[validate(length(max = 1000))]
    pub details: Option<String>,
}

fn validate_report_details(req: &CreateReportRequest) -> Result<(), ValidationError> {
    let has_details = req
        .details
        .as_deref()
        .map(|d| !d.trim().is_empty())
        .unwrap_or(false);

    if req.reason == ReportReason::Other && !has_details {
        let mut err = ValidationError::new("details_required");
        err.message = Some("details are required when reason is 'other'".into());
        return Err(err);
    }
    Ok(())
}

/// What the moderator does with a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportAction {
    Dismiss,
    RemoveReview,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveReportRequest {
    pub action: ReportAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_reason_requires_details() {
        let req = CreateReportRequest {
            reason: ReportReason::Other,
            details: Some("   ".to_string()),
        };
        assert!(req.validate().is_err());

        let req = CreateReportRequest {
            reason: ReportReason::Other,
            details: Some("Advertises a different campsite".to_string()),
        };
        assert!(req.validate().is_ok());

        let req = CreateReportRequest {
            reason: ReportReason::Spam,
            details: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_report_reason_wire_format() {
        let reason: ReportReason = serde_json::from_str("\"inappropriate\"").unwrap();
        assert_eq!(reason, ReportReason::Inappropriate);
        assert!(serde_json::from_str::<ReportReason>("\"boring\"").is_err());

        let action: ReportAction = serde_json::from_str("\"remove_review\"").unwrap();
        assert_eq!(action, ReportAction::RemoveReview);
    }

    #[test]
    fn test_review_rating_range() {
        let req = CreateReviewRequest {
            rating: 6,
            title: None,
            content: "Lovely spot by the river".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
