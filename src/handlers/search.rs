// src/handlers/search.rs
// DOCUMENTATION: HTTP handlers for campsite search
// PURPOSE: Parse URL filter state, call services, return list or map payloads

use crate::errors::CampingError;
use crate::models::MarkersParams;
use crate::services::clustering::to_feature_collection;
use crate::services::{CampsiteService, SearchFilters};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /api/search
/// Filters, sort and page come from the query string (the same string the
/// frontend keeps in its URL); the response echoes the canonical form.
pub async fn search(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, CampingError> {
    let filters = SearchFilters::parse_query_string(req.query_string())?;
    let result = CampsiteService::search(pool.get_ref(), &filters).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/search/markers?zoom=Z[&format=geojson]
/// Clustered markers for all matches; pagination parameters are ignored
pub async fn markers(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    params: web::Query<MarkersParams>,
) -> Result<impl Responder, CampingError> {
    let geojson = match params.format.as_deref() {
        None | Some("json") => false,
        Some("geojson") => true,
        Some(other) => {
            return Err(CampingError::InvalidInput(format!(
                "Unknown format '{}'",
                other
            )))
        }
    };

    let filters = SearchFilters::parse_query_string(req.query_string())?;
    let markers = CampsiteService::markers(pool.get_ref(), &filters, params.zoom).await?;

    if geojson {
        Ok(HttpResponse::Ok()
            .content_type("application/geo+json")
            .json(to_feature_collection(&markers)))
    } else {
        Ok(HttpResponse::Ok().json(markers))
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/search")
            .route("", web::get().to(search))
            .route("/markers", web::get().to(markers)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::lazy_pool;
    use actix_web::{http::StatusCode, test, App};

    #[actix_rt::test]
    async fn test_invalid_price_range_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/search?min_price=900&max_price=100")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[actix_rt::test]
    async fn test_unknown_type_and_format_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/search?type=hotel")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/search/markers?zoom=8&format=kml")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
