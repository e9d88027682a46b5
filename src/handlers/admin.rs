// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for moderation
// PURPOSE: Listing approval, review report resolution and owner applications.
// Every route requires an admin session.

use crate::errors::CampingError;
use crate::handlers::dashboard::StatusPageQuery;
use crate::middleware::AuthUser;
use crate::models::{ApprovalStatus, RejectRequest, ReportStatus, ResolveReportRequest};
use crate::services::{CampsiteService, OwnerRequestService, ResponseCache, ReviewService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Parse an approval status filter; the queue defaults to pending
fn approval_status(raw: Option<&str>) -> Result<ApprovalStatus, CampingError> {
    match raw {
        None => Ok(ApprovalStatus::Pending),
        Some(value) => ApprovalStatus::parse(value)
            .ok_or_else(|| CampingError::InvalidInput(format!("Unknown status '{}'", value))),
    }
}

/// GET /api/admin/campsites?status=pending
pub async fn list_campsites(
    pool: web::Data<PgPool>,
    admin: AuthUser,
    query: web::Query<StatusPageQuery>,
) -> Result<impl Responder, CampingError> {
    admin.require_admin()?;
    let status = approval_status(query.status.as_deref())?;

    let cards = CampsiteService::moderation_queue(pool.get_ref(), status, &query.page()).await?;
    Ok(HttpResponse::Ok().json(cards))
}

/// POST /api/admin/campsites/{id}/approve
pub async fn approve_campsite(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ResponseCache>>,
    admin: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, CampingError> {
    admin.require_admin()?;
    let campsite = CampsiteService::approve(pool.get_ref(), cache.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(campsite))
}

/// POST /api/admin/campsites/{id}/reject
pub async fn reject_campsite(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<ResponseCache>>,
    admin: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<RejectRequest>,
) -> Result<impl Responder, CampingError> {
    admin.require_admin()?;
    let campsite = CampsiteService::reject(
        pool.get_ref(),
        cache.get_ref(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(campsite))
}

/// GET /api/admin/reports?status=pending
pub async fn list_reports(
    pool: web::Data<PgPool>,
    admin: AuthUser,
    query: web::Query<StatusPageQuery>,
) -> Result<impl Responder, CampingError> {
    admin.require_admin()?;
    let status = match query.status.as_deref() {
        None => ReportStatus::Pending,
        Some(value) => ReportStatus::parse(value)
            .ok_or_else(|| CampingError::InvalidInput(format!("Unknown status '{}'", value)))?,
    };

    let reports = ReviewService::list_reports(pool.get_ref(), status, &query.page()).await?;
    Ok(HttpResponse::Ok().json(reports))
}

/// POST /api/admin/reports/{id}/resolve
pub async fn resolve_report(
    pool: web::Data<PgPool>,
    admin: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<ResolveReportRequest>,
) -> Result<impl Responder, CampingError> {
    let report =
        ReviewService::resolve_report(pool.get_ref(), &admin, path.into_inner(), body.action)
            .await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /api/admin/owner-requests?status=pending
pub async fn list_owner_requests(
    pool: web::Data<PgPool>,
    admin: AuthUser,
    query: web::Query<StatusPageQuery>,
) -> Result<impl Responder, CampingError> {
    admin.require_admin()?;
    let status = approval_status(query.status.as_deref())?;

    let requests = OwnerRequestService::list(pool.get_ref(), status, &query.page()).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// POST /api/admin/owner-requests/{id}/approve
pub async fn approve_owner_request(
    pool: web::Data<PgPool>,
    admin: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, CampingError> {
    let request = OwnerRequestService::approve(pool.get_ref(), &admin, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// POST /api/admin/owner-requests/{id}/reject
pub async fn reject_owner_request(
    pool: web::Data<PgPool>,
    admin: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<RejectRequest>,
) -> Result<impl Responder, CampingError> {
    let request =
        OwnerRequestService::reject(pool.get_ref(), &admin, path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(request))
}

/// GET /api/admin/cache/stats
pub async fn cache_stats(
    cache: web::Data<Arc<ResponseCache>>,
    admin: AuthUser,
) -> Result<impl Responder, CampingError> {
    admin.require_admin()?;
    Ok(HttpResponse::Ok().json(cache.stats().await))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .route("/campsites", web::get().to(list_campsites))
            .route("/campsites/{id}/approve", web::post().to(approve_campsite))
            .route("/campsites/{id}/reject", web::post().to(reject_campsite))
            .route("/reports", web::get().to(list_reports))
            .route("/reports/{id}/resolve", web::post().to(resolve_report))
            .route("/owner-requests", web::get().to(list_owner_requests))
            .route("/owner-requests/{id}/approve", web::post().to(approve_owner_request))
            .route("/owner-requests/{id}/reject", web::post().to(reject_owner_request))
            .route("/cache/stats", web::get().to(cache_stats)),
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
    async fn test_approval_status_filter() {
        assert_eq!(approval_status(None).unwrap(), ApprovalStatus::Pending);
        assert_eq!(approval_status(Some("rejected")).unwrap(), ApprovalStatus::Rejected);
        assert!(approval_status(Some("archived")).is_err());
    }

    #[actix_rt::test]
    async fn test_owner_cannot_moderate() {
        let config = Config::for_tests();
        let auth = bearer(UserRole::Owner, &config);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(Arc::new(ResponseCache::new(60))))
                .app_data(web::Data::new(config))
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/campsites/{}/approve", Uuid::new_v4()))
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/reports/{}/resolve", Uuid::new_v4()))
            .insert_header(("Authorization", auth))
            .set_json(serde_json::json!({"action": "dismiss"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }
}
