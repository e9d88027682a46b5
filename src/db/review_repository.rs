// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: Review CRUD, report moderation, and the rating aggregate on campsites

use crate::errors::CampingError;
use crate::models::{
    CreateReportRequest, CreateReviewRequest, ReportAction, ReportStatus, Review, ReviewReport,
    ReviewReportWithReview, ReviewWithAuthor, UpdateReviewRequest,
};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub struct ReviewRepository;

impl ReviewRepository {
    /// Recompute average_rating and review_count for a campsite
    /// DOCUMENTATION: Runs inside the transaction that changed its reviews
    async fn refresh_aggregate(
        tx: &mut Transaction<'_, Postgres>,
        campsite_id: Uuid,
    ) -> Result<(), CampingError> {
        sqlx::query(
            r#"
            UPDATE campsites
            SET average_rating = COALESCE(
                    (SELECT AVG(rating)::real FROM reviews WHERE campsite_id = $1), 0),
                review_count = (SELECT COUNT(*) FROM reviews WHERE campsite_id = $1)::int
            WHERE id = $1
            "#,
        )
        .bind(campsite_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            log::error!("Failed to refresh rating of campsite {}: {}", campsite_id, e);
            CampingError::DatabaseError(e.to_string())
        })?;
        Ok(())
    }

    /// Create a review; one per user and campsite
    pub async fn create_review(
        pool: &PgPool,
        campsite_id: Uuid,
        user_id: Uuid,
        req: &CreateReviewRequest,
    ) -> Result<Review, CampingError> {
        let mut tx = pool.begin().await?;

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (campsite_id, user_id, rating, title, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(campsite_id)
        .bind(user_id)
        .bind(req.rating)
        .bind(&req.title)
        .bind(&req.content)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| CampingError::from_unique(e, "reviews_campsite_user_key", "review"))?;

        Self::refresh_aggregate(&mut tx, campsite_id).await?;
        tx.commit().await?;

        log::info!("Review {} created for campsite {}", review.id, campsite_id);
        Ok(review)
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Review, CampingError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CampingError::NotFound(format!("review {}", id)))
    }

    /// Reviews for a campsite with author info, newest first
    /// Returns tuple: (reviews, total_count)
    pub async fn list_for_campsite(
        pool: &PgPool,
        campsite_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ReviewWithAuthor>, i64), CampingError> {
        let reviews = sqlx::query_as::<_, ReviewWithAuthor>(
            r#"
            SELECT r.*, p.full_name AS author_name, p.avatar_url AS author_avatar_url
            FROM reviews r
            JOIN profiles p ON p.id = r.user_id
            WHERE r.campsite_id = $1
            ORDER BY r.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(campsite_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews: {}", e);
            CampingError::DatabaseError(e.to_string())
        })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE campsite_id = $1")
            .bind(campsite_id)
            .fetch_one(pool)
            .await?;

        Ok((reviews, total))
    }

    /// (rating, count) pairs for the histogram
    pub async fn rating_counts(
        pool: &PgPool,
        campsite_id: Uuid,
    ) -> Result<Vec<(i16, i64)>, CampingError> {
        let rows = sqlx::query_as::<_, (i16, i64)>(
            "SELECT rating, COUNT(*) FROM reviews WHERE campsite_id = $1 GROUP BY rating",
        )
        .bind(campsite_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_review(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateReviewRequest,
    ) -> Result<Review, CampingError> {
        let mut tx = pool.begin().await?;

        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET rating = COALESCE($1, rating),
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(req.rating)
        .bind(&req.title)
        .bind(&req.content)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CampingError::NotFound(format!("review {}", id)))?;

        Self::refresh_aggregate(&mut tx, review.campsite_id).await?;
        tx.commit().await?;
        Ok(review)
    }

    pub async fn delete_review(pool: &PgPool, id: Uuid) -> Result<(), CampingError> {
        let mut tx = pool.begin().await?;
        Self::delete_in_tx(&mut tx, id).await?;
        tx.commit().await?;

        log::info!("Deleted review {}", id);
        Ok(())
    }

    async fn delete_in_tx(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<(), CampingError> {
        let campsite_id: Uuid =
            sqlx::query_scalar("DELETE FROM reviews WHERE id = $1 RETURNING campsite_id")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| CampingError::NotFound(format!("review {}", id)))?;

        Self::refresh_aggregate(tx, campsite_id).await
    }

    /// File a report; one per reporter and review
    pub async fn create_report(
        pool: &PgPool,
        review_id: Uuid,
        reporter_id: Uuid,
        req: &CreateReportRequest,
    ) -> Result<ReviewReport, CampingError> {
        let report = sqlx::query_as::<_, ReviewReport>(
            r#"
            INSERT INTO review_reports (review_id, reporter_id, reason, details)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(review_id)
        .bind(reporter_id)
        .bind(req.reason)
        .bind(&req.details)
        .fetch_one(pool)
        .await
        .map_err(|e| CampingError::from_unique(e, "review_reports_review_reporter_key", "report"))?;

        log::info!("Review {} reported ({:?})", review_id, req.reason);
        Ok(report)
    }

    /// Moderation queue, oldest first
    pub async fn list_reports(
        pool: &PgPool,
        status: ReportStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReviewReportWithReview>, CampingError> {
        let reports = sqlx::query_as::<_, ReviewReportWithReview>(
            r#"
            SELECT
                rr.id, rr.review_id, rr.reporter_id, rr.reason, rr.details, rr.status, rr.created_at,
                r.rating AS review_rating,
                r.content AS review_content,
                r.user_id AS review_author_id,
                r.campsite_id
            FROM review_reports rr
            LEFT JOIN reviews r ON r.id = rr.review_id
            WHERE rr.status = $1
            ORDER BY rr.created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list reports: {}", e);
            CampingError::DatabaseError(e.to_string())
        })?;

        Ok(reports)
    }

    /// Resolve a pending report
    /// DOCUMENTATION: `RemoveReview` deletes the review and closes every pending
    /// report against it; `Dismiss` only closes this report.
    pub async fn resolve_report(
        pool: &PgPool,
        report_id: Uuid,
        admin_id: Uuid,
        action: ReportAction,
    ) -> Result<ReviewReport, CampingError> {
        let mut tx = pool.begin().await?;

        let report = sqlx::query_as::<_, ReviewReport>(
            "SELECT * FROM review_reports WHERE id = $1 FOR UPDATE",
        )
        .bind(report_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CampingError::NotFound(format!("report {}", report_id)))?;

        if report.status != ReportStatus::Pending {
            return Err(CampingError::Conflict("Report already resolved".to_string()));
        }

        let resolved = match action {
            ReportAction::Dismiss => {
                sqlx::query_as::<_, ReviewReport>(
                    r#"
                    UPDATE review_reports
                    SET status = 'dismissed', resolved_by = $1, resolved_at = NOW()
                    WHERE id = $2
                    RETURNING *
                    "#,
                )
                .bind(admin_id)
                .bind(report_id)
                .fetch_one(&mut *tx)
                .await?
            }
            ReportAction::RemoveReview => {
                let review_id = report.review_id.ok_or_else(|| {
                    CampingError::Conflict("Review was already deleted".to_string())
                })?;

                let resolved = sqlx::query_as::<_, ReviewReport>(
                    r#"
                    UPDATE review_reports
                    SET status = 'resolved', resolved_by = $1, resolved_at = NOW()
                    WHERE review_id = $2 AND status = 'pending'
                    RETURNING *
                    "#,
                )
                .bind(admin_id)
                .bind(review_id)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .find(|r| r.id == report_id)
                .ok_or(CampingError::InternalError)?;

                Self::delete_in_tx(&mut tx, review_id).await?;
                resolved
            }
        };

        tx.commit().await?;
        log::info!("Report {} resolved by {}: {:?}", report_id, admin_id, action);
        Ok(resolved)
    }
}
