// src/handlers/campsites.rs
// DOCUMENTATION: HTTP handlers for public campsite pages
// PURPOSE: Detail, comparison, attractions, reviews, inquiries and catalogs

use crate::config::Config;
use crate::errors::CampingError;
use crate::middleware::{AuthUser, OptionalAuthUser};
use crate::models::{CompareQuery, CreateInquiryRequest, CreateReviewRequest, PageQuery};
use crate::services::{
    CampsiteService, GooglePlacesClient, InquiryService, ResponseCache, ReviewService,
};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AttractionsQuery {
    pub radius_km: Option<f64>,
}

/// GET /api/campsites/{id_or_slug}
pub async fn get_campsite(
    pool: web::Data<PgPool>,
    viewer: OptionalAuthUser,
    path: web::Path<String>,
) -> Result<impl Responder, CampingError> {
    let reference = path.into_inner();
    let detail = CampsiteService::detail(pool.get_ref(), &reference, viewer.0).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// GET /api/campsites/compare?ids=a,b[,c,d]
pub async fn compare(
    pool: web::Data<PgPool>,
    query: web::Query<CompareQuery>,
) -> Result<impl Responder, CampingError> {
    let details = CampsiteService::compare(pool.get_ref(), &query.ids).await?;
    Ok(HttpResponse::Ok().json(details))
}

/// GET /api/campsites/{id}/attractions
pub async fn attractions(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    google: web::Data<GooglePlacesClient>,
    path: web::Path<Uuid>,
    query: web::Query<AttractionsQuery>,
) -> Result<impl Responder, CampingError> {
    let radius_km = query.radius_km.unwrap_or(config.attractions_radius_km);
    let result = CampsiteService::attractions(
        pool.get_ref(),
        google.get_ref(),
        path.into_inner(),
        radius_km,
    )
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/campsites/{id}/reviews
pub async fn list_reviews(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, CampingError> {
    let page = ReviewService::list(pool.get_ref(), path.into_inner(), &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /api/campsites/{id}/reviews
pub async fn create_review(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, CampingError> {
    let review =
        ReviewService::create(pool.get_ref(), &user, path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(review))
}

/// POST /api/campsites/{id}/inquiries
/// Guests may write without an account
pub async fn create_inquiry(
    pool: web::Data<PgPool>,
    user: OptionalAuthUser,
    path: web::Path<Uuid>,
    req: web::Json<CreateInquiryRequest>,
) -> Result<impl Responder, CampingError> {
    let inquiry =
        InquiryService::create(pool.get_ref(), user.0, path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(inquiry))
}

/// GET /api/provinces
pub async fn list_provinces(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ResponseCache>>,
) -> Result<impl Responder, CampingError> {
    let provinces = CampsiteService::provinces(pool.get_ref(), cache.get_ref()).await?;
    Ok(HttpResponse::Ok().json(provinces))
}

/// GET /api/amenities
pub async fn list_amenities(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ResponseCache>>,
) -> Result<impl Responder, CampingError> {
    let amenities = CampsiteService::amenities(pool.get_ref(), cache.get_ref()).await?;
    Ok(HttpResponse::Ok().json(amenities))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/provinces", web::get().to(list_provinces))
        .route("/api/amenities", web::get().to(list_amenities))
        .service(
            web::scope("/api/campsites")
                // before /{id} so "compare" is not taken for a slug
                .route("/compare", web::get().to(compare))
                .route("/{id}", web::get().to(get_campsite))
                .route("/{id}/attractions", web::get().to(attractions))
                .route("/{id}/reviews", web::get().to(list_reviews))
                .route("/{id}/reviews", web::post().to(create_review))
                .route("/{id}/inquiries", web::post().to(create_inquiry)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::lazy_pool;
    use actix_web::{http::StatusCode, test, App};

    #[actix_rt::test]
    async fn test_compare_needs_two_ids() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/campsites/compare?ids={}", Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_review_requires_login() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/campsites/{}/reviews", Uuid::new_v4()))
            .set_json(serde_json::json!({"rating": 5, "content": "Lovely river views all night"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
