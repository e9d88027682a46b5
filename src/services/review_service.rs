// src/services/review_service.rs
// DOCUMENTATION: Review rules on top of the review repository

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::ReviewRepository;
use crate::errors::CampingError;
use crate::middleware::AuthUser;
use crate::models::{
    CreateReportRequest, CreateReviewRequest, PageQuery, ReportAction, ReportStatus, Review,
    ReviewReport, ReviewReportWithReview, ReviewWithAuthor, UpdateReviewRequest,
};
use crate::services::CampsiteService;

/// One page of reviews
#[derive(Debug, serde::Serialize)]
pub struct ReviewPage {
    pub data: Vec<ReviewWithAuthor>,
    pub total_count: i64,
    pub page: i64,
    pub limit: i64,
}

/// Authors edit their own reviews; admins moderate any
fn ensure_can_modify(review: &Review, user: &AuthUser) -> Result<(), CampingError> {
    if review.user_id == user.user_id || user.is_admin() {
        Ok(())
    } else {
        Err(CampingError::Forbidden(
            "Only the author can change this review".to_string(),
        ))
    }
}

pub struct ReviewService;

impl ReviewService {
    pub async fn list(
        pool: &PgPool,
        campsite_id: Uuid,
        page: &PageQuery,
    ) -> Result<ReviewPage, CampingError> {
        CampsiteService::load_public(pool, campsite_id).await?;

        let (page_no, limit, offset) = page.resolve(10, 50);
        let (data, total_count) =
            ReviewRepository::list_for_campsite(pool, campsite_id, limit, offset).await?;

        Ok(ReviewPage {
            data,
            total_count,
            page: page_no,
            limit,
        })
    }

    pub async fn create(
        pool: &PgPool,
        user: &AuthUser,
        campsite_id: Uuid,
        req: CreateReviewRequest,
    ) -> Result<Review, CampingError> {
        req.validate()?;

        let campsite = CampsiteService::load_public(pool, campsite_id).await?;
        if campsite.owner_id == user.user_id {
            return Err(CampingError::Forbidden(
                "Owners cannot review their own campsite".to_string(),
            ));
        }

        ReviewRepository::create_review(pool, campsite_id, user.user_id, &req).await
    }

    pub async fn update(
        pool: &PgPool,
        user: &AuthUser,
        review_id: Uuid,
        req: UpdateReviewRequest,
    ) -> Result<Review, CampingError> {
        req.validate()?;

        let review = ReviewRepository::get_by_id(pool, review_id).await?;
        ensure_can_modify(&review, user)?;

        ReviewRepository::update_review(pool, review_id, &req).await
    }

    pub async fn delete(pool: &PgPool, user: &AuthUser, review_id: Uuid) -> Result<(), CampingError> {
        let review = ReviewRepository::get_by_id(pool, review_id).await?;
        ensure_can_modify(&review, user)?;

        ReviewRepository::delete_review(pool, review_id).await
    }

    pub async fn report(
        pool: &PgPool,
        user: &AuthUser,
        review_id: Uuid,
        req: CreateReportRequest,
    ) -> Result<ReviewReport, CampingError> {
        req.validate()?;

        let review = ReviewRepository::get_by_id(pool, review_id).await?;
        if review.user_id == user.user_id {
            return Err(CampingError::Forbidden(
                "You cannot report your own review".to_string(),
            ));
        }

        ReviewRepository::create_report(pool, review_id, user.user_id, &req).await
    }

    pub async fn list_reports(
        pool: &PgPool,
        status: ReportStatus,
        page: &PageQuery,
    ) -> Result<Vec<ReviewReportWithReview>, CampingError> {
        let (_, limit, offset) = page.resolve(20, 100);
        ReviewRepository::list_reports(pool, status, limit, offset).await
    }

    pub async fn resolve_report(
        pool: &PgPool,
        admin: &AuthUser,
        report_id: Uuid,
        action: ReportAction,
    ) -> Result<ReviewReport, CampingError> {
        admin.require_admin()?;
        ReviewRepository::resolve_report(pool, report_id, admin.user_id, action).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use chrono::Utc;

    fn review_by(user_id: Uuid) -> Review {
        Review {
            id: Uuid::new_v4(),
            campsite_id: Uuid::new_v4(),
            user_id,
            rating: 4,
            title: None,
            content: "Quiet site near the waterfall".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_author_and_admin_can_modify() {
        let author = Uuid::new_v4();
        let review = review_by(author);

        let as_author = AuthUser { user_id: author, role: UserRole::User };
        let as_admin = AuthUser { user_id: Uuid::new_v4(), role: UserRole::Admin };
        let as_other = AuthUser { user_id: Uuid::new_v4(), role: UserRole::Owner };

        assert!(ensure_can_modify(&review, &as_author).is_ok());
        assert!(ensure_can_modify(&review, &as_admin).is_ok());
        assert!(matches!(
            ensure_can_modify(&review, &as_other),
            Err(CampingError::Forbidden(_))
        ));
    }
}
