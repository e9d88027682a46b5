// src/handlers/wishlist.rs
// DOCUMENTATION: HTTP handlers for the signed-in user's saved campsites

use crate::db::WishlistRepository;
use crate::errors::CampingError;
use crate::middleware::AuthUser;
use crate::models::WishlistState;
use crate::services::CampsiteService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// GET /api/wishlist
pub async fn list(pool: web::Data<PgPool>, user: AuthUser) -> Result<impl Responder, CampingError> {
    let cards = WishlistRepository::list(pool.get_ref(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(cards))
}

/// GET /api/wishlist/ids
pub async fn ids(pool: web::Data<PgPool>, user: AuthUser) -> Result<impl Responder, CampingError> {
    let ids = WishlistRepository::ids(pool.get_ref(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(ids))
}

/// POST /api/wishlist/{campsite_id}/toggle
pub async fn toggle(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, CampingError> {
    let campsite_id = path.into_inner();
    CampsiteService::load_public(pool.get_ref(), campsite_id).await?;

    let wishlisted = WishlistRepository::toggle(pool.get_ref(), user.user_id, campsite_id).await?;
    Ok(HttpResponse::Ok().json(WishlistState {
        campsite_id,
        wishlisted,
    }))
}

/// PUT /api/wishlist/{campsite_id}
pub async fn add(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, CampingError> {
    let campsite_id = path.into_inner();
    CampsiteService::load_public(pool.get_ref(), campsite_id).await?;

    WishlistRepository::add(pool.get_ref(), user.user_id, campsite_id).await?;
    Ok(HttpResponse::Ok().json(WishlistState {
        campsite_id,
        wishlisted: true,
    }))
}

/// DELETE /api/wishlist/{campsite_id}
/// Removing works even if the listing was unpublished meanwhile
pub async fn remove(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, CampingError> {
    let campsite_id = path.into_inner();
    WishlistRepository::remove(pool.get_ref(), user.user_id, campsite_id).await?;
    Ok(HttpResponse::Ok().json(WishlistState {
        campsite_id,
        wishlisted: false,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/wishlist")
            .route("", web::get().to(list))
            .route("/ids", web::get().to(ids))
            .route("/{campsite_id}/toggle", web::post().to(toggle))
            .route("/{campsite_id}", web::put().to(add))
            .route("/{campsite_id}", web::delete().to(remove)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handlers::test_support::lazy_pool;
    use actix_web::{http::StatusCode, test, App};

    #[actix_rt::test]
    async fn test_wishlist_requires_login() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        for req in [
            test::TestRequest::get().uri("/api/wishlist").to_request(),
            test::TestRequest::get().uri("/api/wishlist/ids").to_request(),
            test::TestRequest::post()
                .uri(&format!("/api/wishlist/{}/toggle", Uuid::new_v4()))
                .to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        }
    }
}
