// src/services/auth_service.rs
// DOCUMENTATION: Account and session workflows
// PURPOSE: Signup, login, refresh-token rotation, logout and profile edits

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::db::{ProfileRepository, TokenRepository};
use crate::errors::CampingError;
use crate::models::{LoginRequest, Profile, ProfileResponse, SignupRequest, UpdateProfileRequest};
use crate::services::session::{
    generate_access_token, generate_refresh_token, hash_password, hash_refresh_token,
    verify_dummy_password, verify_password,
};
use crate::validation::normalize_phone;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Tokens for a freshly issued session
#[derive(Debug)]
pub struct IssuedSession {
    pub profile: ProfileResponse,
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: String,
}

pub struct AuthService;

impl AuthService {
    async fn issue_session(
        pool: &PgPool,
        config: &Config,
        profile: &Profile,
    ) -> Result<IssuedSession, CampingError> {
        let (access_token, access_expires_at) =
            generate_access_token(profile.id, profile.role, config)?;
        let (refresh_token, refresh_hash) = generate_refresh_token();
        let refresh_expires_at = Utc::now() + Duration::days(config.refresh_token_ttl_days);

        TokenRepository::store(pool, profile.id, &refresh_hash, refresh_expires_at).await?;

        Ok(IssuedSession {
            profile: profile.to_response(),
            access_token,
            access_expires_at,
            refresh_token,
        })
    }

    /// Register a new account and sign it in
    pub async fn signup(
        pool: &PgPool,
        config: &Config,
        req: SignupRequest,
    ) -> Result<IssuedSession, CampingError> {
        req.validate()?;

        let email = req.email.trim().to_lowercase();
        let password_hash = hash_password(&req.password)?;
        let phone = req.phone.as_deref().map(normalize_phone);

        let profile = ProfileRepository::create(
            pool,
            &email,
            &password_hash,
            req.full_name.trim(),
            phone.as_deref(),
        )
        .await?;

        log::info!("New account signed up: {}", profile.id);
        Self::issue_session(pool, config, &profile).await
    }

    /// Check credentials; unknown email and wrong password look the same
    pub async fn login(
        pool: &PgPool,
        config: &Config,
        req: LoginRequest,
    ) -> Result<IssuedSession, CampingError> {
        req.validate()?;

        let Some(profile) = ProfileRepository::find_by_email(pool, req.email.trim()).await? else {
            verify_dummy_password(&req.password);
            return Err(CampingError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&req.password, &profile.password_hash)? {
            log::warn!("Failed login for profile {}", profile.id);
            return Err(CampingError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        log::info!("Profile {} logged in", profile.id);
        Self::issue_session(pool, config, &profile).await
    }

    /// Rotate a refresh token: the presented token is revoked and a new pair issued
    pub async fn refresh(
        pool: &PgPool,
        config: &Config,
        refresh_token: Option<&str>,
    ) -> Result<IssuedSession, CampingError> {
        let token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CampingError::Unauthorized("Missing refresh token".to_string()))?;

        let profile_id = TokenRepository::consume(pool, &hash_refresh_token(token))
            .await?
            .ok_or_else(|| CampingError::Unauthorized("Invalid refresh token".to_string()))?;

        // Role changes (e.g. owner approval) take effect here
        let profile = ProfileRepository::get_by_id(pool, profile_id)
            .await
            .map_err(|_| CampingError::Unauthorized("Invalid refresh token".to_string()))?;

        Self::issue_session(pool, config, &profile).await
    }

    pub async fn logout(pool: &PgPool, refresh_token: Option<&str>) -> Result<(), CampingError> {
        if let Some(token) = refresh_token.filter(|t| !t.is_empty()) {
            TokenRepository::revoke(pool, &hash_refresh_token(token)).await?;
        }
        Ok(())
    }

    pub async fn me(pool: &PgPool, user_id: Uuid) -> Result<ProfileResponse, CampingError> {
        let profile = ProfileRepository::get_by_id(pool, user_id).await?;
        Ok(profile.to_response())
    }

    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<ProfileResponse, CampingError> {
        req.validate()?;

        let phone = req.phone.as_deref().map(normalize_phone);
        let profile = ProfileRepository::update(pool, user_id, &req, phone.as_deref()).await?;

        log::info!("Profile {} updated", user_id);
        Ok(profile.to_response())
    }
}
