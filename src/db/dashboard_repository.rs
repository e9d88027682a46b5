// src/db/dashboard_repository.rs
// DOCUMENTATION: Aggregates behind the owner dashboard

use crate::errors::CampingError;
use crate::models::{DailyViews, DashboardStats};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

pub struct DashboardRepository;

impl DashboardRepository {
    /// Headline numbers across all active listings of an owner
    pub async fn stats(pool: &PgPool, owner_id: Uuid) -> Result<DashboardStats, CampingError> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            WITH owned AS (
                SELECT * FROM campsites WHERE owner_id = $1 AND is_active = true
            )
            SELECT
                (SELECT COUNT(*) FROM owned) AS total_campsites,
                (SELECT COUNT(*) FROM owned WHERE status = 'approved') AS approved_campsites,
                (SELECT COUNT(*) FROM owned WHERE status = 'pending') AS pending_campsites,
                (SELECT COUNT(*) FROM owned WHERE status = 'rejected') AS rejected_campsites,
                (SELECT COALESCE(SUM(view_count), 0)::bigint FROM owned) AS total_views,
                (SELECT COALESCE(SUM(v.views), 0)::bigint
                   FROM campsite_daily_views v JOIN owned o ON o.id = v.campsite_id
                   WHERE v.day > CURRENT_DATE - 30) AS views_last_30_days,
                (SELECT COUNT(*) FROM wishlists w JOIN owned o ON o.id = w.campsite_id) AS wishlist_saves,
                (SELECT COUNT(*) FROM reviews r JOIN owned o ON o.id = r.campsite_id) AS review_count,
                (SELECT COALESCE(AVG(r.rating), 0)::float8
                   FROM reviews r JOIN owned o ON o.id = r.campsite_id) AS average_rating,
                (SELECT COUNT(*) FROM inquiries i JOIN owned o ON o.id = i.campsite_id
                   WHERE i.status = 'new') AS new_inquiries
            "#,
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to compute dashboard stats for {}: {}", owner_id, e);
            CampingError::DatabaseError(e.to_string())
        })?;

        Ok(stats)
    }

    /// Per-day views between `start` and `end` inclusive; days without views are absent
    pub async fn daily_views(
        pool: &PgPool,
        owner_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyViews>, CampingError> {
        let rows = sqlx::query_as::<_, DailyViews>(
            r#"
            SELECT v.day, SUM(v.views)::bigint AS views
            FROM campsite_daily_views v
            JOIN campsites c ON c.id = v.campsite_id
            WHERE c.owner_id = $1 AND c.is_active = true
              AND v.day BETWEEN $2 AND $3
            GROUP BY v.day
            ORDER BY v.day
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to load daily views for {}: {}", owner_id, e);
            CampingError::DatabaseError(e.to_string())
        })?;

        Ok(rows)
    }
}
