// src/services/campsite_service.rs
// DOCUMENTATION: Business logic for campsites
// PURPOSE: Intermediary between handlers and repositories for search, detail
// pages, comparisons, nearby attractions, owner listing management and moderation

use geo_types::Point;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::{
    AttractionRepository, CampsiteRepository, ProvinceRepository, ReviewRepository,
};
use crate::errors::CampingError;
use crate::middleware::AuthUser;
use crate::models::*;
use crate::services::cache::{ResponseCache, AMENITIES_KEY, PROVINCES_KEY};
use crate::services::clustering::{MarkerCluster, MarkerClusterer, MarkerPoint, MAX_MAP_ZOOM};
use crate::services::geo::{haversine_km, BoundingBox};
use crate::services::search_filters::SearchFilters;
use crate::services::GooglePlacesClient;
use crate::validation::{normalize_phone, slugify};

pub const RECENT_REVIEWS: i64 = 5;
pub const MIN_COMPARE: usize = 2;
pub const MAX_COMPARE: usize = 4;
pub const MAX_ATTRACTION_RADIUS_KM: f64 = 100.0;
/// Country-level view of Thailand
pub const DEFAULT_MARKER_ZOOM: u8 = 6;
const SLUG_ATTEMPTS: usize = 3;

/// Parse `ids=a,b,c` for the comparison page: 2 to 4 distinct UUIDs, order kept
pub fn parse_compare_ids(raw: &str) -> Result<Vec<Uuid>, CampingError> {
    let mut ids: Vec<Uuid> = Vec::new();

    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = Uuid::parse_str(part)
            .map_err(|_| CampingError::InvalidInput(format!("Invalid campsite id '{}'", part)))?;
        if ids.contains(&id) {
            return Err(CampingError::InvalidInput(format!(
                "Campsite {} listed twice",
                id
            )));
        }
        ids.push(id);
    }

    if ids.len() < MIN_COMPARE || ids.len() > MAX_COMPARE {
        return Err(CampingError::InvalidInput(format!(
            "Compare between {} and {} campsites",
            MIN_COMPARE, MAX_COMPARE
        )));
    }
    Ok(ids)
}

/// First free slug among `base`, `base-2`, `base-3`, ...
pub fn next_available_slug(base: &str, existing: &[String]) -> String {
    if !existing.iter().any(|s| s == base) {
        return base.to_string();
    }

    let prefix = format!("{}-", base);
    let highest = existing
        .iter()
        .filter_map(|s| s.strip_prefix(&prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(1);

    format!("{}-{}", base, highest + 1)
}

/// Owners and admins may open listings that are not public yet
fn can_preview(campsite: &Campsite, viewer: Option<AuthUser>) -> bool {
    match viewer {
        Some(user) => user.is_admin() || (campsite.owner_id == user.user_id && campsite.is_active),
        None => false,
    }
}

fn normalize_amenity_slugs(slugs: &[String]) -> Vec<String> {
    let mut out: Vec<String> = slugs
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

pub struct CampsiteService;

impl CampsiteService {
    /// Filtered, sorted, paginated search
    pub async fn search(
        pool: &PgPool,
        filters: &SearchFilters,
    ) -> Result<SearchResponse, CampingError> {
        let (data, total_count) = CampsiteRepository::search(pool, filters).await?;

        let has_more = filters.offset() + (data.len() as i64) < total_count;

        Ok(SearchResponse {
            data,
            total_count,
            page: filters.page,
            limit: filters.limit,
            has_more,
            query_string: filters.to_query_string(),
            active_filters: filters.active_filter_count(),
        })
    }

    /// Clustered markers for every match of the filters
    pub async fn markers(
        pool: &PgPool,
        filters: &SearchFilters,
        zoom: Option<u8>,
    ) -> Result<Vec<MarkerCluster>, CampingError> {
        let zoom = zoom.unwrap_or(DEFAULT_MARKER_ZOOM);
        if zoom > MAX_MAP_ZOOM {
            return Err(CampingError::InvalidInput(format!(
                "zoom must be between 0 and {}",
                MAX_MAP_ZOOM
            )));
        }

        let rows = CampsiteRepository::search_points(pool, filters).await?;
        let points: Vec<MarkerPoint> = rows.iter().map(MarkerPoint::from).collect();

        Ok(MarkerClusterer::default().cluster(&points, zoom))
    }

    /// Detail page by UUID or slug; counts a view for public listings
    pub async fn detail(
        pool: &PgPool,
        reference: &str,
        viewer: Option<AuthUser>,
    ) -> Result<CampsiteDetail, CampingError> {
        let campsite = match Uuid::parse_str(reference) {
            Ok(id) => CampsiteRepository::get_by_id(pool, id).await?,
            Err(_) => CampsiteRepository::get_by_slug(pool, reference).await?,
        };

        if !campsite.is_public() {
            if !can_preview(&campsite, viewer) {
                return Err(CampingError::NotFound(format!("campsite '{}'", reference)));
            }
        } else if viewer.map(|v| v.user_id) != Some(campsite.owner_id) {
            // A failed counter update must not break the page
            if let Err(e) = CampsiteRepository::record_view(pool, campsite.id).await {
                log::warn!("Could not record view for {}: {}", campsite.id, e);
            }
        }

        Self::build_detail(pool, campsite).await
    }

    async fn build_detail(pool: &PgPool, campsite: Campsite) -> Result<CampsiteDetail, CampingError> {
        let province = ProvinceRepository::get_by_id(pool, campsite.province_id).await?;
        let amenities = CampsiteRepository::amenities(pool, campsite.id).await?;
        let images = CampsiteRepository::images(pool, campsite.id).await?;
        let counts = ReviewRepository::rating_counts(pool, campsite.id).await?;
        let (recent_reviews, _) =
            ReviewRepository::list_for_campsite(pool, campsite.id, RECENT_REVIEWS, 0).await?;
        let owner = CampsiteRepository::owner_contact(pool, campsite.owner_id).await?;

        Ok(CampsiteDetail {
            province: ProvinceRef {
                slug: province.slug,
                name_en: province.name_en,
                name_th: province.name_th,
            },
            amenities,
            images,
            rating: RatingSummary::from_counts(&counts),
            recent_reviews,
            owner,
            campsite,
        })
    }

    /// Side-by-side details in the requested order
    pub async fn compare(pool: &PgPool, raw_ids: &str) -> Result<Vec<CampsiteDetail>, CampingError> {
        let ids = parse_compare_ids(raw_ids)?;
        let mut details = Vec::with_capacity(ids.len());

        for id in ids {
            let campsite = Self::load_public(pool, id).await?;
            details.push(Self::build_detail(pool, campsite).await?);
        }
        Ok(details)
    }

    /// Listing that anonymous visitors may see, else 404
    pub async fn load_public(pool: &PgPool, id: Uuid) -> Result<Campsite, CampingError> {
        let campsite = CampsiteRepository::get_by_id(pool, id).await?;
        if !campsite.is_public() {
            return Err(CampingError::NotFound(format!("campsite {}", id)));
        }
        Ok(campsite)
    }

    /// Attractions near a campsite, nearest first
    /// DOCUMENTATION: Stored attractions win; Google Places is only asked when
    /// none are stored in range and an API key is configured.
    pub async fn attractions(
        pool: &PgPool,
        google: &GooglePlacesClient,
        campsite_id: Uuid,
        radius_km: f64,
    ) -> Result<AttractionsResponse, CampingError> {
        if !(radius_km > 0.0 && radius_km <= MAX_ATTRACTION_RADIUS_KM) {
            return Err(CampingError::InvalidInput(format!(
                "radius_km must be in (0, {}]",
                MAX_ATTRACTION_RADIUS_KM
            )));
        }

        let campsite = Self::load_public(pool, campsite_id).await?;
        let origin = Point::new(campsite.longitude, campsite.latitude);
        let bbox = BoundingBox::around(origin, radius_km);

        let mut attractions: Vec<NearbyAttraction> = AttractionRepository::within_box(pool, &bbox)
            .await?
            .into_iter()
            .map(|a| {
                let distance_km = haversine_km(origin, Point::new(a.longitude, a.latitude));
                NearbyAttraction {
                    id: a.id.to_string(),
                    name: a.name,
                    category: a.category,
                    description: a.description,
                    image_url: a.image_url,
                    latitude: a.latitude,
                    longitude: a.longitude,
                    distance_km: (distance_km * 10.0).round() / 10.0,
                    rating: None,
                    source: "local".to_string(),
                }
            })
            .filter(|a| a.distance_km <= radius_km)
            .collect();
        attractions.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        if attractions.is_empty() && google.is_configured() {
            match google
                .nearby_attractions(campsite.latitude, campsite.longitude, radius_km)
                .await
            {
                Ok(found) => attractions = found,
                Err(e) => log::warn!("Google attractions lookup failed for {}: {}", campsite_id, e),
            }
        }

        Ok(AttractionsResponse {
            campsite_id,
            radius_km,
            attractions,
        })
    }

    /// Provinces with public listing counts (cached)
    pub async fn provinces(
        pool: &PgPool,
        cache: &ResponseCache,
    ) -> Result<Vec<ProvinceWithCount>, CampingError> {
        if let Some(cached) = cache.get_json::<Vec<ProvinceWithCount>>(PROVINCES_KEY).await {
            return Ok(cached);
        }
        let provinces = ProvinceRepository::list_with_counts(pool).await?;
        cache.set_json(PROVINCES_KEY.to_string(), &provinces).await;
        Ok(provinces)
    }

    /// Amenity catalog (cached)
    pub async fn amenities(pool: &PgPool, cache: &ResponseCache) -> Result<Vec<Amenity>, CampingError> {
        if let Some(cached) = cache.get_json::<Vec<Amenity>>(AMENITIES_KEY).await {
            return Ok(cached);
        }
        let amenities = ProvinceRepository::list_amenities(pool).await?;
        cache.set_json(AMENITIES_KEY.to_string(), &amenities).await;
        Ok(amenities)
    }

    // ----- Owner dashboard -----

    /// Active listing the user may manage; foreign listings are reported as missing
    pub async fn load_owned(
        pool: &PgPool,
        user: &AuthUser,
        id: Uuid,
    ) -> Result<Campsite, CampingError> {
        user.require_owner()?;
        let campsite = CampsiteRepository::get_by_id(pool, id).await?;

        if !campsite.is_active || (campsite.owner_id != user.user_id && !user.is_admin()) {
            return Err(CampingError::NotFound(format!("campsite {}", id)));
        }
        Ok(campsite)
    }

    pub async fn list_owned(pool: &PgPool, user: &AuthUser) -> Result<Vec<CampsiteCard>, CampingError> {
        user.require_owner()?;
        CampsiteRepository::list_by_owner(pool, user.user_id).await
    }

    /// New listing awaiting moderation
    pub async fn create_owned(
        pool: &PgPool,
        user: &AuthUser,
        mut req: CreateCampsiteRequest,
    ) -> Result<Campsite, CampingError> {
        user.require_owner()?;
        req.validate()?;

        let province = ProvinceRepository::get_by_slug(pool, req.province.trim()).await?;
        let amenity_ids =
            ProvinceRepository::amenity_ids(pool, &normalize_amenity_slugs(&req.amenities)).await?;
        req.phone = req.phone.as_deref().map(normalize_phone);

        let base = slugify(&req.name);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let existing = CampsiteRepository::slugs_like(pool, &base).await?;
            let slug = next_available_slug(&base, &existing);

            match CampsiteRepository::create(pool, user.user_id, province.id, &slug, &req, &amenity_ids)
                .await
            {
                // Lost a race for the slug; pick the next one
                Err(CampingError::AlreadyExists(_)) if attempt < SLUG_ATTEMPTS => continue,
                other => return other,
            }
        }
    }

    /// Edit a listing; edits by the owner send it back to moderation
    pub async fn update_owned(
        pool: &PgPool,
        cache: &ResponseCache,
        user: &AuthUser,
        id: Uuid,
        mut req: UpdateCampsiteRequest,
    ) -> Result<Campsite, CampingError> {
        req.validate()?;
        let campsite = Self::load_owned(pool, user, id).await?;

        let province_id = match req.province.as_deref() {
            Some(slug) => Some(ProvinceRepository::get_by_slug(pool, slug.trim()).await?.id),
            None => None,
        };
        let amenity_ids = match &req.amenities {
            Some(slugs) => {
                Some(ProvinceRepository::amenity_ids(pool, &normalize_amenity_slugs(slugs)).await?)
            }
            None => None,
        };
        req.phone = req.phone.as_deref().map(normalize_phone);

        let resubmit = !user.is_admin();
        let updated = CampsiteRepository::update(
            pool,
            campsite.id,
            province_id,
            &req,
            amenity_ids.as_deref(),
            resubmit,
        )
        .await?;

        if campsite.is_public() {
            cache.invalidate(PROVINCES_KEY).await;
        }
        Ok(updated)
    }

    pub async fn delete_owned(
        pool: &PgPool,
        cache: &ResponseCache,
        user: &AuthUser,
        id: Uuid,
    ) -> Result<(), CampingError> {
        let campsite = Self::load_owned(pool, user, id).await?;
        CampsiteRepository::soft_delete(pool, campsite.id).await?;

        if campsite.is_public() {
            cache.invalidate(PROVINCES_KEY).await;
        }
        Ok(())
    }

    pub async fn add_image(
        pool: &PgPool,
        user: &AuthUser,
        id: Uuid,
        req: CreateImageRequest,
    ) -> Result<CampsiteImage, CampingError> {
        req.validate()?;
        let campsite = Self::load_owned(pool, user, id).await?;
        CampsiteRepository::add_image(pool, campsite.id, &req).await
    }

    pub async fn delete_image(
        pool: &PgPool,
        user: &AuthUser,
        id: Uuid,
        image_id: Uuid,
    ) -> Result<(), CampingError> {
        let campsite = Self::load_owned(pool, user, id).await?;
        CampsiteRepository::delete_image(pool, campsite.id, image_id).await
    }

    // ----- Moderation -----

    pub async fn moderation_queue(
        pool: &PgPool,
        status: ApprovalStatus,
        page: &PageQuery,
    ) -> Result<Vec<CampsiteCard>, CampingError> {
        let (_, limit, offset) = page.resolve(20, 100);
        CampsiteRepository::list_by_status(pool, status, limit, offset).await
    }

    pub async fn approve(
        pool: &PgPool,
        cache: &ResponseCache,
        id: Uuid,
    ) -> Result<Campsite, CampingError> {
        let campsite =
            CampsiteRepository::set_status(pool, id, ApprovalStatus::Approved, None).await?;
        cache.invalidate(PROVINCES_KEY).await;
        Ok(campsite)
    }

    pub async fn reject(
        pool: &PgPool,
        cache: &ResponseCache,
        id: Uuid,
        req: RejectRequest,
    ) -> Result<Campsite, CampingError> {
        req.validate()?;
        let note = req.note.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let campsite =
            CampsiteRepository::set_status(pool, id, ApprovalStatus::Rejected, note).await?;
        cache.invalidate(PROVINCES_KEY).await;
        Ok(campsite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    #[test]
    fn test_parse_compare_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let ids = parse_compare_ids(&format!("{}, {}", b, a)).unwrap();
        assert_eq!(ids, vec![b, a]);

        assert!(parse_compare_ids(&a.to_string()).is_err());
        assert!(parse_compare_ids(&format!("{},{}", a, a)).is_err());
        assert!(parse_compare_ids(&format!("{},nope", a)).is_err());

        let five: Vec<String> = (0..5).map(|_| Uuid::new_v4().to_string()).collect();
        assert!(parse_compare_ids(&five.join(",")).is_err());
    }

    #[test]
    fn test_next_available_slug() {
        assert_eq!(next_available_slug("doi-inthanon", &[]), "doi-inthanon");

        let existing = vec!["doi-inthanon".to_string()];
        assert_eq!(next_available_slug("doi-inthanon", &existing), "doi-inthanon-2");

        let existing = vec![
            "doi-inthanon".to_string(),
            "doi-inthanon-2".to_string(),
            "doi-inthanon-7".to_string(),
            "doi-inthanon-camp".to_string(),
        ];
        assert_eq!(next_available_slug("doi-inthanon", &existing), "doi-inthanon-8");

        // Only suffixed slugs exist; the base is free
        let existing = vec!["khao-yai-2".to_string()];
        assert_eq!(next_available_slug("khao-yai", &existing), "khao-yai");
    }

    #[test]
    fn test_normalize_amenity_slugs() {
        let slugs = vec![" WiFi".to_string(), "toilet".to_string(), "wifi".to_string(), "".to_string()];
        assert_eq!(normalize_amenity_slugs(&slugs), vec!["toilet", "wifi"]);
    }

    fn campsite(owner_id: Uuid) -> Campsite {
        let now = chrono::Utc::now();
        Campsite {
            id: Uuid::new_v4(),
            owner_id,
            province_id: 1,
            name: "Pine Hill".to_string(),
            slug: "pine-hill".to_string(),
            description: None,
            campsite_type: CampsiteType::Camping,
            status: ApprovalStatus::Pending,
            rejection_reason: None,
            price_per_night: 300,
            max_guests: None,
            latitude: 18.5,
            longitude: 98.5,
            address: None,
            phone: None,
            email: None,
            website: None,
            check_in_time: None,
            check_out_time: None,
            average_rating: 0.0,
            review_count: 0,
            view_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_preview_rules() {
        let owner = Uuid::new_v4();
        let site = campsite(owner);

        assert!(!can_preview(&site, None));
        assert!(can_preview(
            &site,
            Some(AuthUser { user_id: owner, role: UserRole::Owner })
        ));
        assert!(!can_preview(
            &site,
            Some(AuthUser { user_id: Uuid::new_v4(), role: UserRole::Owner })
        ));
        assert!(can_preview(
            &site,
            Some(AuthUser { user_id: Uuid::new_v4(), role: UserRole::Admin })
        ));
    }
}
