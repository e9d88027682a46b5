// src/handlers/auth.rs
// DOCUMENTATION: HTTP handlers for accounts and sessions
// PURPOSE: Signup/login/refresh/logout set or clear the session cookies

use crate::config::Config;
use crate::errors::CampingError;
use crate::middleware::{client_ip, AuthUser};
use crate::models::{LoginRequest, SessionResponse, SignupRequest, UpdateProfileRequest};
use crate::services::session::{cleared_cookies, session_cookies, REFRESH_COOKIE};
use crate::services::{AuthService, IssuedSession, LoginRateLimiter};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;

fn session_response(status: StatusCode, session: IssuedSession, config: &Config) -> HttpResponse {
    let (access, refresh) = session_cookies(&session.access_token, &session.refresh_token, config);
    HttpResponse::build(status)
        .cookie(access)
        .cookie(refresh)
        .json(SessionResponse {
            profile: session.profile,
            access_token_expires_at: session.access_expires_at,
        })
}

fn refresh_cookie(req: &HttpRequest) -> Option<String> {
    req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string())
}

/// POST /api/auth/signup
pub async fn signup(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<SignupRequest>,
) -> Result<impl Responder, CampingError> {
    let session = AuthService::signup(pool.get_ref(), &config, req.into_inner()).await?;
    Ok(session_response(StatusCode::CREATED, session, &config))
}

/// POST /api/auth/login
/// Attempts are throttled per client address before credentials are checked
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<LoginRateLimiter>,
    http: HttpRequest,
    req: web::Json<LoginRequest>,
) -> Result<impl Responder, CampingError> {
    limiter.check(&client_ip(&http, &config.trusted_proxies))?;

    let session = AuthService::login(pool.get_ref(), &config, req.into_inner()).await?;
    Ok(session_response(StatusCode::OK, session, &config))
}

/// POST /api/auth/refresh
pub async fn refresh(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    http: HttpRequest,
) -> Result<impl Responder, CampingError> {
    let token = refresh_cookie(&http);
    let session = AuthService::refresh(pool.get_ref(), &config, token.as_deref()).await?;
    Ok(session_response(StatusCode::OK, session, &config))
}

/// POST /api/auth/logout
pub async fn logout(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    http: HttpRequest,
) -> Result<impl Responder, CampingError> {
    let token = refresh_cookie(&http);
    AuthService::logout(pool.get_ref(), token.as_deref()).await?;

    let (access, refresh) = cleared_cookies(&config);
    Ok(HttpResponse::NoContent().cookie(access).cookie(refresh).finish())
}

/// GET /api/auth/me
pub async fn me(pool: web::Data<PgPool>, user: AuthUser) -> Result<impl Responder, CampingError> {
    let profile = AuthService::me(pool.get_ref(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/profile
pub async fn update_profile(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, CampingError> {
    let profile = AuthService::update_profile(pool.get_ref(), user.user_id, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    )
    .route("/api/profile", web::put().to(update_profile));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::lazy_pool;
    use actix_web::{test, App};
    use serde_json::json;

    #[actix_rt::test]
    async fn test_login_is_rate_limited() {
        let config = Config::for_tests();
        let attempts = config.login_attempts_per_minute;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(LoginRateLimiter::per_minute(attempts)))
                .app_data(web::Data::new(config))
                .configure(super::config),
        )
        .await;

        // Malformed emails fail validation without touching the database
        for _ in 0..attempts {
            let req = test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": "not-an-email", "password": "x"}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "not-an-email", "password": "x"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_rt::test]
    async fn test_refresh_without_cookie_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(Config::for_tests()))
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/auth/refresh").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_signup_rejects_bad_phone() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(Config::for_tests()))
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({
                "email": "somchai@example.com",
                "password": "long-enough-password",
                "full_name": "Somchai",
                "phone": "12345"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_rotating_forwarded_for_shares_peer_quota() {
        let config = Config::for_tests();
        let attempts = config.login_attempts_per_minute;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(LoginRateLimiter::per_minute(attempts)))
                .app_data(web::Data::new(config))
                .configure(super::config),
        )
        .await;

        let peer: std::net::SocketAddr = "203.0.113.7:40000".parse().unwrap();
        let mut throttled = 0;
        for i in 0..(attempts + 5) {
            let req = test::TestRequest::post()
                .uri("/api/auth/login")
                .peer_addr(peer)
                .insert_header(("X-Forwarded-For", format!("198.51.100.{}", i)))
                .set_json(json!({"email": "not-an-email", "password": "x"}))
                .to_request();
            if test::call_service(&app, req).await.status() == StatusCode::TOO_MANY_REQUESTS {
                throttled += 1;
            }
        }
        assert_eq!(throttled, 5);
    }
}
