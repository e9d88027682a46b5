// src/handlers/owner_requests.rs
// DOCUMENTATION: HTTP handlers for applying to become an owner

use crate::errors::CampingError;
use crate::middleware::AuthUser;
use crate::models::CreateOwnerRequest;
use crate::services::OwnerRequestService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// POST /api/owner-requests
pub async fn create(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateOwnerRequest>,
) -> Result<impl Responder, CampingError> {
    let request = OwnerRequestService::create(pool.get_ref(), &user, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(request))
}

/// GET /api/owner-requests/me
/// Latest application of the caller
pub async fn mine(pool: web::Data<PgPool>, user: AuthUser) -> Result<impl Responder, CampingError> {
    let request = OwnerRequestService::mine(pool.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(request))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/owner-requests")
            .route("", web::post().to(create))
            .route("/me", web::get().to(mine)),
    );
}
