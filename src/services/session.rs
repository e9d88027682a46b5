// src/services/session.rs
// DOCUMENTATION: Credentials and session tokens
// PURPOSE: Argon2id password hashes, HS256 access tokens, opaque refresh
// tokens (only their SHA-256 hash is stored) and the cookies carrying them.

use actix_web::cookie::{time, Cookie, SameSite};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::CampingError;
use crate::models::UserRole;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
/// Refresh cookie is only sent to the auth endpoints
const REFRESH_COOKIE_PATH: &str = "/api/auth";

/// JWT claims embedded in every access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Profile id
    pub sub: Uuid,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
    /// Unique token identifier
    pub jti: String,
}

/// Hash a plaintext password using Argon2id with a random salt
pub fn hash_password(password: &str) -> Result<String, CampingError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Password hashing failed: {}", e);
            CampingError::InternalError
        })
}

/// Verify a plaintext password against a stored PHC string
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CampingError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        log::error!("Stored password hash is malformed: {}", e);
        CampingError::InternalError
    })?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => {
            log::error!("Password verification failed: {}", e);
            Err(CampingError::InternalError)
        }
    }
}

/// Hash checked when no account matches, so unknown emails cost the same argon2 work
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("no-such-account-placeholder").ok());

/// Spend one password verification on the login miss path
pub fn verify_dummy_password(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Issue an access token; returns the token and its expiry
pub fn generate_access_token(
    user_id: Uuid,
    role: UserRole,
    config: &Config,
) -> Result<(String, DateTime<Utc>), CampingError> {
    let now = Utc::now();
    let expires_at = now + Duration::minutes(config.access_token_ttl_minutes);

    let claims = Claims {
        sub: user_id,
        role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        log::error!("Failed to sign access token: {}", e);
        CampingError::InternalError
    })?;

    Ok((token, expires_at))
}

/// Validate signature and expiry of an access token
pub fn validate_token(token: &str, config: &Config) -> Result<Claims, CampingError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| CampingError::Unauthorized("Invalid or expired token".to_string()))
}

/// Returns (plaintext, sha256 hex); only the hash is persisted
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let hash = hash_refresh_token(&plaintext);
    (plaintext, hash)
}

pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// httpOnly cookies carrying both tokens
pub fn session_cookies(
    access_token: &str,
    refresh_token: &str,
    config: &Config,
) -> (Cookie<'static>, Cookie<'static>) {
    let access = Cookie::build(ACCESS_COOKIE, access_token.to_string())
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(config.access_token_ttl_minutes))
        .finish();

    let refresh = Cookie::build(REFRESH_COOKIE, refresh_token.to_string())
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::days(config.refresh_token_ttl_days))
        .finish();

    (access, refresh)
}

/// Expired cookies that make the browser drop the session
pub fn cleared_cookies(config: &Config) -> (Cookie<'static>, Cookie<'static>) {
    let mut access = Cookie::build(ACCESS_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .finish();
    access.make_removal();

    let mut refresh = Cookie::build(REFRESH_COOKIE, "")
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .secure(config.cookie_secure)
        .finish();
    refresh.make_removal();

    (access, refresh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct-horse-battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse-battery", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_dummy_hash_is_real_argon2() {
        let hash = DUMMY_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        // A miss must cost a full verification, not a parse failure
        assert!(!verify_password("anything-else", hash).unwrap());
        verify_dummy_password("anything-else");
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(CampingError::InternalError)
        ));
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = Config::for_tests();
        let user_id = Uuid::new_v4();
        let (token, expires_at) = generate_access_token(user_id, UserRole::Owner, &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, UserRole::Owner);
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_expired_token_fails() {
        let config = Config::for_tests();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: UserRole::User,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            validate_token(&token, &config),
            Err(CampingError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_different_secret_fails() {
        let config = Config::for_tests();
        let (token, _) = generate_access_token(Uuid::new_v4(), UserRole::User, &config).unwrap();

        let mut other = Config::for_tests();
        other.jwt_secret = "another-secret".to_string();
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn test_refresh_token_hash() {
        let (plaintext, hash) = generate_refresh_token();
        assert_eq!(hash, hash_refresh_token(&plaintext));
        assert_eq!(hash.len(), 64);
        assert_eq!(plaintext.len(), 64);
    }

    #[test]
    fn test_session_cookies() {
        let config = Config::for_tests();
        let (access, refresh) = session_cookies("a", "r", &config);
        assert_eq!(access.name(), ACCESS_COOKIE);
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(refresh.path(), Some(REFRESH_COOKIE_PATH));

        let (access, _) = cleared_cookies(&config);
        assert_eq!(access.value(), "");
        assert_eq!(access.max_age(), Some(time::Duration::ZERO));
    }
}
