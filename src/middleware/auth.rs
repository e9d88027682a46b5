// src/middleware/auth.rs
// DOCUMENTATION: Session extractors for actix handlers
// PURPOSE: The access token is read from the `access_token` cookie set at
// login, or from an `Authorization: Bearer <token>` header for non-browser
// clients.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use std::net::IpAddr;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::CampingError;
use crate::models::UserRole;
use crate::services::session::{validate_token, ACCESS_COOKIE};

/// Authenticated user; rejects the request with 401 when there is no valid session
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> Result<HttpResponse, CampingError> {
///     log::info!("handling request for {}", user.user_id);
///     Ok(HttpResponse::Ok().finish())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// 403 unless the user may manage listings
    pub fn require_owner(&self) -> Result<(), CampingError> {
        if self.role.can_manage_listings() {
            Ok(())
        } else {
            Err(CampingError::Forbidden("owner account required".to_string()))
        }
    }

    /// 403 unless the user is an admin
    pub fn require_admin(&self) -> Result<(), CampingError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CampingError::Forbidden("admin account required".to_string()))
        }
    }
}

/// Session if present; invalid or missing tokens yield `None`
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

fn token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(header) = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = header.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }

    req.cookie(ACCESS_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, CampingError> {
    let config = req.app_data::<web::Data<Config>>().ok_or_else(|| {
        log::error!("Config missing from app data");
        CampingError::InternalError
    })?;

    let token = token_from_request(req)
        .ok_or_else(|| CampingError::Unauthorized("Authentication required".to_string()))?;

    let claims = validate_token(&token, config)?;
    Ok(AuthUser {
        user_id: claims.sub,
        role: claims.role,
    })
}

impl FromRequest for AuthUser {
    type Error = CampingError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl FromRequest for OptionalAuthUser {
    type Error = CampingError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match authenticate(req) {
            Ok(user) => Ok(OptionalAuthUser(Some(user))),
            Err(CampingError::Unauthorized(_)) => Ok(OptionalAuthUser(None)),
            Err(e) => Err(e),
        })
    }
}

/// Client address for rate limiting
/// Forwarding headers are only honoured when the socket peer is a trusted proxy
pub fn client_ip(req: &HttpRequest, trusted_proxies: &[IpAddr]) -> String {
    match req.peer_addr().map(|addr| addr.ip()) {
        Some(peer) if trusted_proxies.contains(&peer) => req
            .connection_info()
            .realip_remote_addr()
            .map(str::to_string)
            .unwrap_or_else(|| peer.to_string()),
        Some(peer) => peer.to_string(),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session::generate_access_token;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    fn request_with_config() -> TestRequest {
        TestRequest::default().app_data(web::Data::new(Config::for_tests()))
    }

    #[actix_rt::test]
    async fn test_missing_token_is_unauthorized() {
        let req = request_with_config().to_http_request();
        let result = AuthUser::extract(&req).await;
        assert!(matches!(result, Err(CampingError::Unauthorized(_))));

        let optional = OptionalAuthUser::extract(&req).await.unwrap();
        assert!(optional.0.is_none());
    }

    #[actix_rt::test]
    async fn test_bearer_token() {
        let config = Config::for_tests();
        let user_id = Uuid::new_v4();
        let (token, _) = generate_access_token(user_id, UserRole::Admin, &config).unwrap();

        let req = request_with_config()
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();
        let user = AuthUser::extract(&req).await.unwrap();
        assert_eq!(user.user_id, user_id);
        assert!(user.require_admin().is_ok());
    }

    #[actix_rt::test]
    async fn test_cookie_token_and_roles() {
        let config = Config::for_tests();
        let (token, _) = generate_access_token(Uuid::new_v4(), UserRole::User, &config).unwrap();

        let req = request_with_config()
            .cookie(Cookie::new(ACCESS_COOKIE, token))
            .to_http_request();
        let user = AuthUser::extract(&req).await.unwrap();
        assert!(matches!(user.require_owner(), Err(CampingError::Forbidden(_))));
        assert!(matches!(user.require_admin(), Err(CampingError::Forbidden(_))));
    }

    #[actix_rt::test]
    async fn test_garbage_token() {
        let req = request_with_config()
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .to_http_request();
        assert!(AuthUser::extract(&req).await.is_err());
    }

    #[test]
    fn test_client_ip_ignores_untrusted_forwarding() {
        let peer: std::net::SocketAddr = "203.0.113.7:51000".parse().unwrap();
        let req = TestRequest::default()
            .peer_addr(peer)
            .insert_header(("X-Forwarded-For", "198.51.100.1"))
            .to_http_request();
        assert_eq!(client_ip(&req, &[]), "203.0.113.7");

        let proxy: IpAddr = "203.0.113.7".parse().unwrap();
        assert_eq!(client_ip(&req, &[proxy]), "198.51.100.1");
    }

    #[test]
    fn test_client_ip_from_trusted_proxy_without_header() {
        let peer: std::net::SocketAddr = "10.0.0.2:8080".parse().unwrap();
        let req = TestRequest::default().peer_addr(peer).to_http_request();
        assert_eq!(client_ip(&req, &[peer.ip()]), "10.0.0.2");
    }
}
