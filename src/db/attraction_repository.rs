// src/db/attraction_repository.rs
// DOCUMENTATION: Stored points of interest near campsites

use crate::errors::CampingError;
use crate::models::Attraction;
use crate::services::geo::BoundingBox;
use sqlx::PgPool;

pub struct AttractionRepository;

impl AttractionRepository {
    /// Attractions inside a bounding box; callers refine by exact distance
    pub async fn within_box(
        pool: &PgPool,
        bbox: &BoundingBox,
    ) -> Result<Vec<Attraction>, CampingError> {
        let attractions = sqlx::query_as::<_, Attraction>(
            r#"
            SELECT id, name, category, description, image_url, latitude, longitude
            FROM attractions
            WHERE latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
            "#,
        )
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lng)
        .bind(bbox.max_lng)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to query attractions: {}", e);
            CampingError::DatabaseError(e.to_string())
        })?;

        Ok(attractions)
    }
}
