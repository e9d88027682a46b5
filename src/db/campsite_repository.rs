// src/db/campsite_repository.rs
// DOCUMENTATION: Database access layer for campsites
// PURPOSE: Search, detail lookups, owner CRUD, images and view counters

use crate::errors::CampingError;
use crate::models::*;
use crate::services::search_filters::SearchFilters;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Rows returned to the map at most; the client narrows with bounds
pub const MAX_MARKER_POINTS: i64 = 2000;

/// Card projection: campsite + province + primary image + amenity slugs
const CARD_SELECT: &str = r#"
    SELECT
        c.id, c.slug, c.name, c.campsite_type, c.status,
        c.price_per_night, c.average_rating, c.review_count,
        c.latitude, c.longitude,
        p.slug AS province_slug,
        p.name_en AS province_name_en,
        p.name_th AS province_name_th,
        img.url AS primary_image_url,
        ARRAY(
            SELECT a.slug
            FROM campsite_amenities ca
            JOIN amenities a ON a.id = ca.amenity_id
            WHERE ca.campsite_id = c.id
            ORDER BY a.slug
        ) AS amenity_slugs
    FROM campsites c
    JOIN provinces p ON p.id = c.province_id
    LEFT JOIN LATERAL (
        SELECT url
        FROM campsite_images
        WHERE campsite_id = c.id
        ORDER BY is_primary DESC, display_order ASC, created_at ASC
        LIMIT 1
    ) img ON true
"#;

/// Escape LIKE wildcards in user text
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Append the WHERE clause for public search over the `c`/`p` aliases
fn push_search_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &SearchFilters) {
    qb.push(" WHERE c.status = 'approved' AND c.is_active = true");

    if let Some(q) = &filters.q {
        let pattern = like_pattern(q);
        qb.push(" AND (c.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.address ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(province) = &filters.province {
        qb.push(" AND p.slug = ").push_bind(province.clone());
    }

    if !filters.types.is_empty() {
        let types: Vec<String> = filters.types.iter().map(|t| t.as_str().to_string()).collect();
        qb.push(" AND c.campsite_type::text = ANY(")
            .push_bind(types)
            .push(")");
    }

    if let Some(min) = filters.min_price {
        qb.push(" AND c.price_per_night >= ").push_bind(min);
    }

    if let Some(max) = filters.max_price {
        qb.push(" AND c.price_per_night <= ").push_bind(max);
    }

    if !filters.amenities.is_empty() {
        qb.push(
            " AND c.id IN (SELECT ca.campsite_id FROM campsite_amenities ca \
             JOIN amenities a ON a.id = ca.amenity_id WHERE a.slug = ANY(",
        )
        .push_bind(filters.amenities.clone())
        .push(") GROUP BY ca.campsite_id HAVING COUNT(DISTINCT a.slug) = ")
        .push_bind(filters.amenities.len() as i64)
        .push(")");
    }

    if let Some(bounds) = &filters.bounds {
        qb.push(" AND c.latitude BETWEEN ")
            .push_bind(bounds.south)
            .push(" AND ")
            .push_bind(bounds.north);

        if bounds.crosses_antimeridian() {
            qb.push(" AND (c.longitude >= ")
                .push_bind(bounds.west)
                .push(" OR c.longitude <= ")
                .push_bind(bounds.east)
                .push(")");
        } else {
            qb.push(" AND c.longitude BETWEEN ")
                .push_bind(bounds.west)
                .push(" AND ")
                .push_bind(bounds.east);
        }
    }
}

pub struct CampsiteRepository;

impl CampsiteRepository {
    /// Search public campsites
    /// DOCUMENTATION: Used for GET /api/search
    /// Returns tuple: (results, total_count) for pagination
    pub async fn search(
        pool: &PgPool,
        filters: &SearchFilters,
    ) -> Result<(Vec<CampsiteCard>, i64), CampingError> {
        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM campsites c JOIN provinces p ON p.id = c.province_id",
        );
        push_search_filters(&mut count_qb, filters);

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Count query error: {}", e);
                CampingError::DatabaseError(e.to_string())
            })?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(CARD_SELECT);
        push_search_filters(&mut qb, filters);
        qb.push(" ORDER BY ")
            .push(filters.sort.order_by_sql())
            .push(" LIMIT ")
            .push_bind(filters.limit)
            .push(" OFFSET ")
            .push_bind(filters.offset());

        log::debug!("Executing search query: {}", qb.sql());

        let cards = qb
            .build_query_as::<CampsiteCard>()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Search query error: {}", e);
                CampingError::DatabaseError(e.to_string())
            })?;

        log::info!(
            "Search completed: {} results, {} total (page {})",
            cards.len(),
            total,
            filters.page
        );

        Ok((cards, total))
    }

    /// Coordinates of every public campsite matching the filters (pagination ignored)
    pub async fn search_points(
        pool: &PgPool,
        filters: &SearchFilters,
    ) -> Result<Vec<CampsitePoint>, CampingError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT c.id, c.latitude, c.longitude FROM campsites c \
             JOIN provinces p ON p.id = c.province_id",
        );
        push_search_filters(&mut qb, filters);
        qb.push(" ORDER BY c.id LIMIT ").push_bind(MAX_MARKER_POINTS);

        qb.build_query_as::<CampsitePoint>()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Marker query error: {}", e);
                CampingError::DatabaseError(e.to_string())
            })
    }

    /// Retrieve campsite by ID regardless of status
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Campsite, CampingError> {
        sqlx::query_as::<_, Campsite>("SELECT * FROM campsites WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching campsite: {}", e);
                CampingError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Campsite not found: {}", id);
                CampingError::NotFound(format!("campsite {}", id))
            })
    }

    /// Retrieve campsite by URL slug regardless of status
    pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<Campsite, CampingError> {
        sqlx::query_as::<_, Campsite>("SELECT * FROM campsites WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching campsite {}: {}", slug, e);
                CampingError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Campsite not found with slug: {}", slug);
                CampingError::NotFound(format!("campsite '{}'", slug))
            })
    }

    /// Active listings of one owner, newest first
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<Vec<CampsiteCard>, CampingError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(CARD_SELECT);
        qb.push(" WHERE c.is_active = true AND c.owner_id = ")
            .push_bind(owner_id)
            .push(" ORDER BY c.created_at DESC");

        qb.build_query_as::<CampsiteCard>()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list campsites for owner {}: {}", owner_id, e);
                CampingError::DatabaseError(e.to_string())
            })
    }

    /// Moderation queue, oldest first
    pub async fn list_by_status(
        pool: &PgPool,
        status: ApprovalStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CampsiteCard>, CampingError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(CARD_SELECT);
        qb.push(" WHERE c.is_active = true AND c.status = ")
            .push_bind(status)
            .push(" ORDER BY c.created_at ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        qb.build_query_as::<CampsiteCard>()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list campsites by status: {}", e);
                CampingError::DatabaseError(e.to_string())
            })
    }

    /// Slugs equal to `base` or `base-N`, for uniqueness checks
    pub async fn slugs_like(pool: &PgPool, base: &str) -> Result<Vec<String>, CampingError> {
        sqlx::query_scalar::<_, String>(
            "SELECT slug FROM campsites WHERE slug = $1 OR slug LIKE $2",
        )
        .bind(base)
        .bind(format!("{}-%", base))
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to look up slugs: {}", e);
            CampingError::DatabaseError(e.to_string())
        })
    }

    /// Create new campsite with its amenities
    /// DOCUMENTATION: Inserts in one transaction; listing starts as pending
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        province_id: i32,
        slug: &str,
        req: &CreateCampsiteRequest,
        amenity_ids: &[i32],
    ) -> Result<Campsite, CampingError> {
        let mut tx = pool.begin().await?;

        let campsite = sqlx::query_as::<_, Campsite>(
            r#"
            INSERT INTO campsites (
                owner_id, province_id, name, slug, description, campsite_type,
                price_per_night, max_guests, latitude, longitude,
                address, phone, email, website, check_in_time, check_out_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(owner_id) // $1
        .bind(province_id) // $2
        .bind(&req.name) // $3
        .bind(slug) // $4
        .bind(&req.description) // $5
        .bind(req.campsite_type) // $6
        .bind(req.price_per_night) // $7
        .bind(req.max_guests) // $8
        .bind(req.latitude) // $9
        .bind(req.longitude) // $10
        .bind(&req.address) // $11
        .bind(&req.phone) // $12
        .bind(&req.email) // $13
        .bind(&req.website) // $14
        .bind(&req.check_in_time) // $15
        .bind(&req.check_out_time) // $16
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| CampingError::from_unique(e, "campsites_slug_key", "campsite slug"))?;

        Self::replace_amenities(&mut tx, campsite.id, amenity_ids).await?;
        tx.commit().await?;

        log::info!("Created campsite {} ({})", campsite.id, campsite.slug);
        Ok(campsite)
    }

    async fn replace_amenities(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        campsite_id: Uuid,
        amenity_ids: &[i32],
    ) -> Result<(), CampingError> {
        sqlx::query("DELETE FROM campsite_amenities WHERE campsite_id = $1")
            .bind(campsite_id)
            .execute(&mut **tx)
            .await?;

        if !amenity_ids.is_empty() {
            sqlx::query(
                "INSERT INTO campsite_amenities (campsite_id, amenity_id) \
                 SELECT $1, UNNEST($2::int[])",
            )
            .bind(campsite_id)
            .bind(amenity_ids.to_vec())
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Update existing campsite
    /// DOCUMENTATION: Partial update - only provided fields are modified.
    /// With `resubmit` the listing goes back to the moderation queue.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        province_id: Option<i32>,
        req: &UpdateCampsiteRequest,
        amenity_ids: Option<&[i32]>,
        resubmit: bool,
    ) -> Result<Campsite, CampingError> {
        let mut tx = pool.begin().await?;

        let campsite = sqlx::query_as::<_, Campsite>(
            r#"
            UPDATE campsites
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                campsite_type = COALESCE($3, campsite_type),
                province_id = COALESCE($4, province_id),
                price_per_night = COALESCE($5, price_per_night),
                max_guests = COALESCE($6, max_guests),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude),
                address = COALESCE($9, address),
                phone = COALESCE($10, phone),
                email = COALESCE($11, email),
                website = COALESCE($12, website),
                check_in_time = COALESCE($13, check_in_time),
                check_out_time = COALESCE($14, check_out_time),
                status = CASE WHEN $15 THEN 'pending'::approval_status ELSE status END,
                rejection_reason = CASE WHEN $15 THEN NULL ELSE rejection_reason END,
                updated_at = NOW()
            WHERE id = $16 AND is_active = true
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.campsite_type)
        .bind(province_id)
        .bind(req.price_per_night)
        .bind(req.max_guests)
        .bind(req.latitude)
        .bind(req.longitude)
        .bind(&req.address)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.website)
        .bind(&req.check_in_time)
        .bind(&req.check_out_time)
        .bind(resubmit)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Update failed for campsite {}: {}", id, e);
            CampingError::DatabaseError(e.to_string())
        })?
        .ok_or_else(|| CampingError::NotFound(format!("campsite {}", id)))?;

        if let Some(ids) = amenity_ids {
            Self::replace_amenities(&mut tx, id, ids).await?;
        }
        tx.commit().await?;

        log::info!("Updated campsite: {}", id);
        Ok(campsite)
    }

    /// Soft delete campsite
    /// DOCUMENTATION: Sets is_active=false instead of physical deletion
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<(), CampingError> {
        let rows = sqlx::query(
            "UPDATE campsites SET is_active = false, updated_at = NOW() WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Delete failed for campsite {}: {}", id, e);
            CampingError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        if rows == 0 {
            return Err(CampingError::NotFound(format!("campsite {}", id)));
        }

        log::info!("Deleted campsite: {}", id);
        Ok(())
    }

    /// Approve or reject a listing
    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: ApprovalStatus,
        reason: Option<&str>,
    ) -> Result<Campsite, CampingError> {
        let campsite = sqlx::query_as::<_, Campsite>(
            r#"
            UPDATE campsites
            SET status = $1, rejection_reason = $2, updated_at = NOW()
            WHERE id = $3 AND is_active = true
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(reason)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CampingError::NotFound(format!("campsite {}", id)))?;

        log::info!("Campsite {} moderated: {:?}", id, status);
        Ok(campsite)
    }

    /// Amenities offered by a campsite
    pub async fn amenities(pool: &PgPool, campsite_id: Uuid) -> Result<Vec<Amenity>, CampingError> {
        let amenities = sqlx::query_as::<_, Amenity>(
            r#"
            SELECT a.id, a.slug, a.name_en, a.name_th, a.icon
            FROM amenities a
            JOIN campsite_amenities ca ON ca.amenity_id = a.id
            WHERE ca.campsite_id = $1
            ORDER BY a.name_en
            "#,
        )
        .bind(campsite_id)
        .fetch_all(pool)
        .await?;
        Ok(amenities)
    }

    /// Images in display order, primary first
    pub async fn images(
        pool: &PgPool,
        campsite_id: Uuid,
    ) -> Result<Vec<CampsiteImage>, CampingError> {
        let images = sqlx::query_as::<_, CampsiteImage>(
            r#"
            SELECT * FROM campsite_images
            WHERE campsite_id = $1
            ORDER BY is_primary DESC, display_order ASC, created_at ASC
            "#,
        )
        .bind(campsite_id)
        .fetch_all(pool)
        .await?;
        Ok(images)
    }

    /// Add an image; the first image of a listing always becomes primary
    pub async fn add_image(
        pool: &PgPool,
        campsite_id: Uuid,
        req: &CreateImageRequest,
    ) -> Result<CampsiteImage, CampingError> {
        let mut tx = pool.begin().await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM campsite_images WHERE campsite_id = $1")
                .bind(campsite_id)
                .fetch_one(&mut *tx)
                .await?;

        let is_primary = req.is_primary || existing == 0;
        if is_primary {
            sqlx::query("UPDATE campsite_images SET is_primary = false WHERE campsite_id = $1")
                .bind(campsite_id)
                .execute(&mut *tx)
                .await?;
        }

        let image = sqlx::query_as::<_, CampsiteImage>(
            r#"
            INSERT INTO campsite_images (campsite_id, url, alt_text, is_primary, display_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(campsite_id)
        .bind(&req.url)
        .bind(&req.alt_text)
        .bind(is_primary)
        .bind(existing as i32)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(image)
    }

    /// Delete an image, promoting the next one when the primary goes
    pub async fn delete_image(
        pool: &PgPool,
        campsite_id: Uuid,
        image_id: Uuid,
    ) -> Result<(), CampingError> {
        let mut tx = pool.begin().await?;

        let was_primary: bool = sqlx::query_scalar(
            "DELETE FROM campsite_images WHERE id = $1 AND campsite_id = $2 RETURNING is_primary",
        )
        .bind(image_id)
        .bind(campsite_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CampingError::NotFound(format!("image {}", image_id)))?;

        if was_primary {
            sqlx::query(
                r#"
                UPDATE campsite_images SET is_primary = true
                WHERE id = (
                    SELECT id FROM campsite_images
                    WHERE campsite_id = $1
                    ORDER BY display_order ASC, created_at ASC
                    LIMIT 1
                )
                "#,
            )
            .bind(campsite_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Owner contact block
    pub async fn owner_contact(pool: &PgPool, owner_id: Uuid) -> Result<OwnerContact, CampingError> {
        sqlx::query_as::<_, OwnerContact>(
            "SELECT id, full_name, avatar_url FROM profiles WHERE id = $1",
        )
        .bind(owner_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CampingError::NotFound(format!("profile {}", owner_id)))
    }

    /// Count a detail page view (total and per day)
    pub async fn record_view(pool: &PgPool, campsite_id: Uuid) -> Result<(), CampingError> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE campsites SET view_count = view_count + 1 WHERE id = $1")
            .bind(campsite_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO campsite_daily_views (campsite_id, day, views)
            VALUES ($1, CURRENT_DATE, 1)
            ON CONFLICT (campsite_id, day) DO UPDATE
            SET views = campsite_daily_views.views + 1
            "#,
        )
        .bind(campsite_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchQuery;

    fn filters(raw: &str) -> SearchFilters {
        SearchFilters::parse_query_string(raw).unwrap()
    }

    fn where_sql(filters: &SearchFilters) -> String {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM campsites c");
        push_search_filters(&mut qb, filters);
        qb.sql().to_string()
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_default_filters_only_public() {
        let sql = where_sql(&SearchFilters::from_query(&SearchQuery::default()).unwrap());
        assert!(sql.ends_with("WHERE c.status = 'approved' AND c.is_active = true"));
    }

    #[test]
    fn test_filters_are_bound_not_interpolated() {
        let sql = where_sql(&filters(
            "q=o'brien&province=krabi&type=camping&min_price=100&max_price=900&amenities=wifi,toilet",
        ));

        assert!(!sql.contains("o'brien"));
        assert!(!sql.contains("krabi"));
        assert!(sql.contains("p.slug = $4"));
        assert!(sql.contains("c.campsite_type::text = ANY($5)"));
        assert!(sql.contains("c.price_per_night >= $6"));
        assert!(sql.contains("c.price_per_night <= $7"));
        assert!(sql.contains("HAVING COUNT(DISTINCT a.slug) = $9"));
    }

    #[test]
    fn test_antimeridian_bounds() {
        let sql = where_sql(&filters("north=10&south=-10&east=-170&west=170"));
        assert!(sql.contains("(c.longitude >= $3 OR c.longitude <= $4)"));

        let sql = where_sql(&filters("north=20&south=5&east=106&west=97"));
        assert!(sql.contains("c.longitude BETWEEN $3 AND $4"));
    }
}
