// src/db/wishlist_repository.rs
// DOCUMENTATION: Saved campsites per user

use crate::errors::CampingError;
use crate::models::CampsiteCard;
use sqlx::PgPool;
use uuid::Uuid;

pub struct WishlistRepository;

impl WishlistRepository {
    /// Saved campsites as cards, most recently saved first
    /// DOCUMENTATION: Listings that were deactivated or unpublished drop out
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<CampsiteCard>, CampingError> {
        let cards = sqlx::query_as::<_, CampsiteCard>(
            r#"
            SELECT
                c.id, c.slug, c.name, c.campsite_type, c.status,
                c.price_per_night, c.average_rating, c.review_count,
                c.latitude, c.longitude,
                p.slug AS province_slug,
                p.name_en AS province_name_en,
                p.name_th AS province_name_th,
                (SELECT url FROM campsite_images
                 WHERE campsite_id = c.id
                 ORDER BY is_primary DESC, display_order ASC
                 LIMIT 1) AS primary_image_url,
                ARRAY(
                    SELECT a.slug FROM campsite_amenities ca
                    JOIN amenities a ON a.id = ca.amenity_id
                    WHERE ca.campsite_id = c.id
                    ORDER BY a.slug
                ) AS amenity_slugs
            FROM wishlists w
            JOIN campsites c ON c.id = w.campsite_id
            JOIN provinces p ON p.id = c.province_id
            WHERE w.user_id = $1 AND c.status = 'approved' AND c.is_active = true
            ORDER BY w.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch wishlist for {}: {}", user_id, e);
            CampingError::DatabaseError(e.to_string())
        })?;

        Ok(cards)
    }

    /// Ids only, for heart icons on result pages
    pub async fn ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, CampingError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT campsite_id FROM wishlists WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(ids)
    }

    /// Idempotent add; returns true when a row was inserted
    pub async fn add(pool: &PgPool, user_id: Uuid, campsite_id: Uuid) -> Result<bool, CampingError> {
        let result = sqlx::query(
            "INSERT INTO wishlists (user_id, campsite_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(campsite_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Idempotent remove; returns true when a row was deleted
    pub async fn remove(
        pool: &PgPool,
        user_id: Uuid,
        campsite_id: Uuid,
    ) -> Result<bool, CampingError> {
        let result = sqlx::query("DELETE FROM wishlists WHERE user_id = $1 AND campsite_id = $2")
            .bind(user_id)
            .bind(campsite_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip membership; returns the new state
    pub async fn toggle(
        pool: &PgPool,
        user_id: Uuid,
        campsite_id: Uuid,
    ) -> Result<bool, CampingError> {
        if Self::remove(pool, user_id, campsite_id).await? {
            return Ok(false);
        }
        Self::add(pool, user_id, campsite_id).await?;
        Ok(true)
    }
}
