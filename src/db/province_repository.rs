// src/db/province_repository.rs
// DOCUMENTATION: Reference data (provinces and amenity catalog)

use crate::errors::CampingError;
use crate::models::{Amenity, Province, ProvinceWithCount};
use sqlx::PgPool;

pub struct ProvinceRepository;

impl ProvinceRepository {
    /// All provinces with the number of public campsites in each
    /// DOCUMENTATION: Provinces without listings are included with a zero count
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<ProvinceWithCount>, CampingError> {
        let provinces = sqlx::query_as::<_, ProvinceWithCount>(
            r#"
            SELECT
                p.id, p.slug, p.name_en, p.name_th, p.region, p.latitude, p.longitude,
                COUNT(c.id) AS campsite_count
            FROM provinces p
            LEFT JOIN campsites c
                ON c.province_id = p.id AND c.status = 'approved' AND c.is_active = true
            GROUP BY p.id
            ORDER BY p.name_en
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list provinces: {}", e);
            CampingError::DatabaseError(e.to_string())
        })?;

        Ok(provinces)
    }

    pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<Province, CampingError> {
        sqlx::query_as::<_, Province>("SELECT * FROM provinces WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CampingError::InvalidInput(format!("Unknown province '{}'", slug)))
    }

    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Province, CampingError> {
        sqlx::query_as::<_, Province>("SELECT * FROM provinces WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CampingError::NotFound(format!("province {}", id)))
    }

    /// Amenity catalog ordered by English name
    pub async fn list_amenities(pool: &PgPool) -> Result<Vec<Amenity>, CampingError> {
        let amenities = sqlx::query_as::<_, Amenity>(
            "SELECT id, slug, name_en, name_th, icon FROM amenities ORDER BY name_en",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list amenities: {}", e);
            CampingError::DatabaseError(e.to_string())
        })?;

        Ok(amenities)
    }

    /// Resolve amenity slugs to ids; unknown slugs are a client error
    pub async fn amenity_ids(pool: &PgPool, slugs: &[String]) -> Result<Vec<i32>, CampingError> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(i32, String)> =
            sqlx::query_as("SELECT id, slug FROM amenities WHERE slug = ANY($1)")
                .bind(slugs.to_vec())
                .fetch_all(pool)
                .await?;

        let unknown: Vec<&str> = slugs
            .iter()
            .filter(|s| !rows.iter().any(|(_, slug)| slug == *s))
            .map(|s| s.as_str())
            .collect();
        if !unknown.is_empty() {
            return Err(CampingError::InvalidInput(format!(
                "Unknown amenities: {}",
                unknown.join(", ")
            )));
        }

        Ok(rows.into_iter().map(|(id, _)| id).collect())
    }
}
