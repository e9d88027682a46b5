// src/handlers/reviews.rs
// DOCUMENTATION: HTTP handlers for editing and reporting reviews

use crate::errors::CampingError;
use crate::middleware::AuthUser;
use crate::models::{CreateReportRequest, UpdateReviewRequest};
use crate::services::ReviewService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// PUT /api/reviews/{id}
pub async fn update_review(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateReviewRequest>,
) -> Result<impl Responder, CampingError> {
    let review =
        ReviewService::update(pool.get_ref(), &user, path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(review))
}

/// DELETE /api/reviews/{id}
pub async fn delete_review(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, CampingError> {
    ReviewService::delete(pool.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/reviews/{id}/report
pub async fn report_review(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<CreateReportRequest>,
) -> Result<impl Responder, CampingError> {
    let report =
        ReviewService::report(pool.get_ref(), &user, path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(report))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/reviews")
            .route("/{id}", web::put().to(update_review))
            .route("/{id}", web::delete().to(delete_review))
            .route("/{id}/report", web::post().to(report_review)),
    );
}
