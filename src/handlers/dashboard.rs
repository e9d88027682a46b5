// src/handlers/dashboard.rs
// DOCUMENTATION: HTTP handlers for the owner dashboard
// PURPOSE: Listing management, analytics and the inquiry inbox.
// Every route requires an owner (or admin) session.

use crate::errors::CampingError;
use crate::middleware::AuthUser;
use crate::models::{
    CreateCampsiteRequest, CreateImageRequest, InquiryStatus, PageQuery,
    UpdateCampsiteRequest, UpdateInquiryStatusRequest,
};
use crate::services::{CampsiteService, DashboardService, ResponseCache};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<i64>,
}

/// Status filter plus paging for list endpoints
#[derive(Debug, Deserialize)]
pub struct StatusPageQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl StatusPageQuery {
    pub fn page(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// GET /api/dashboard/stats
pub async fn stats(pool: web::Data<PgPool>, user: AuthUser) -> Result<impl Responder, CampingError> {
    let stats = DashboardService::stats(pool.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/dashboard/analytics?days=30
pub async fn analytics(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<AnalyticsQuery>,
) -> Result<impl Responder, CampingError> {
    let analytics = DashboardService::analytics(pool.get_ref(), &user, query.days).await?;
    Ok(HttpResponse::Ok().json(analytics))
}

/// GET /api/dashboard/campsites
pub async fn list_campsites(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<impl Responder, CampingError> {
    let cards = CampsiteService::list_owned(pool.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(cards))
}

/// POST /api/dashboard/campsites
pub async fn create_campsite(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateCampsiteRequest>,
) -> Result<impl Responder, CampingError> {
    let campsite = CampsiteService::create_owned(pool.get_ref(), &user, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(campsite))
}

/// GET /api/dashboard/campsites/{id}
pub async fn get_campsite(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, CampingError> {
    let campsite = CampsiteService::load_owned(pool.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(campsite))
}

/// PUT /api/dashboard/campsites/{id}
pub async fn update_campsite(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ResponseCache>>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateCampsiteRequest>,
) -> Result<impl Responder, CampingError> {
    let campsite = CampsiteService::update_owned(
        pool.get_ref(),
        cache.get_ref(),
        &user,
        path.into_inner(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(campsite))
}

/// DELETE /api/dashboard/campsites/{id}
pub async fn delete_campsite(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ResponseCache>>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, CampingError> {
    CampsiteService::delete_owned(pool.get_ref(), cache.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/dashboard/campsites/{id}/images
pub async fn add_image(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<CreateImageRequest>,
) -> Result<impl Responder, CampingError> {
    let image =
        CampsiteService::add_image(pool.get_ref(), &user, path.into_inner(), req.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(image))
}

/// DELETE /api/dashboard/campsites/{id}/images/{image_id}
pub async fn delete_image(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, CampingError> {
    let (campsite_id, image_id) = path.into_inner();
    CampsiteService::delete_image(pool.get_ref(), &user, campsite_id, image_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/dashboard/inquiries?status=new
pub async fn list_inquiries(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<StatusPageQuery>,
) -> Result<impl Responder, CampingError> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(InquiryStatus::parse(raw).ok_or_else(|| {
            CampingError::InvalidInput(format!("Unknown inquiry status '{}'", raw))
        })?),
        None => None,
    };

    let inquiries =
        DashboardService::inquiries(pool.get_ref(), &user, status, &query.page()).await?;
    Ok(HttpResponse::Ok().json(inquiries))
}

/// PATCH /api/dashboard/inquiries/{id}
pub async fn update_inquiry(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateInquiryStatusRequest>,
) -> Result<impl Responder, CampingError> {
    let inquiry =
        DashboardService::update_inquiry(pool.get_ref(), &user, path.into_inner(), req.status)
            .await?;
    Ok(HttpResponse::Ok().json(inquiry))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/dashboard")
            .route("/stats", web::get().to(stats))
            .route("/analytics", web::get().to(analytics))
            .route("/campsites", web::get().to(list_campsites))
            .route("/campsites", web::post().to(create_campsite))
            .route("/campsites/{id}", web::get().to(get_campsite))
            .route("/campsites/{id}", web::put().to(update_campsite))
            .route("/campsites/{id}", web::delete().to(delete_campsite))
            .route("/campsites/{id}/images", web::post().to(add_image))
            .route("/campsites/{id}/images/{image_id}", web::delete().to(delete_image))
            .route("/inquiries", web::get().to(list_inquiries))
            .route("/inquiries/{id}", web::patch().to(update_inquiry)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handlers::test_support::{bearer, lazy_pool};
    use crate::models::UserRole;
    use actix_web::{http::StatusCode, test, App};

    #[actix_rt::test]
    async fn test_plain_users_are_forbidden() {
        let config = Config::for_tests();
        let auth = bearer(UserRole::User, &config);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(config))
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/dashboard/stats")
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/api/dashboard/campsites")
            .insert_header(("Authorization", auth))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn test_analytics_days_out_of_range() {
        let config = Config::for_tests();
        let auth = bearer(UserRole::Owner, &config);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(config))
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/dashboard/analytics?days=365")
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/dashboard/inquiries?status=archived")
            .insert_header(("Authorization", auth))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
