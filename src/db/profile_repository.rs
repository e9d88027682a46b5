// src/db/profile_repository.rs
// DOCUMENTATION: Profiles and refresh token storage
// PURPOSE: Account rows plus the hashed refresh tokens backing sessions

use crate::errors::CampingError;
use crate::models::{Profile, UpdateProfileRequest};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ProfileRepository;

impl ProfileRepository {
    /// Create a new account (role `user`)
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        full_name: &str,
        phone: Option<&str>,
    ) -> Result<Profile, CampingError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (email, password_hash, full_name, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(phone)
        .fetch_one(pool)
        .await
        .map_err(|e| CampingError::from_unique(e, "profiles_email_key", "email"))?;

        log::info!("Created profile {}", profile.id);
        Ok(profile)
    }

    /// Case-insensitive email lookup
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Profile>, CampingError> {
        let profile =
            sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE LOWER(email) = LOWER($1)")
                .bind(email)
                .fetch_optional(pool)
                .await
                .map_err(|e| {
                    log::error!("Database error looking up profile: {}", e);
                    CampingError::DatabaseError(e.to_string())
                })?;
        Ok(profile)
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Profile, CampingError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CampingError::NotFound(format!("profile {}", id)))
    }

    /// Partial update of the editable profile fields
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateProfileRequest,
        phone: Option<&str>,
    ) -> Result<Profile, CampingError> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET full_name = COALESCE($1, full_name),
                phone = COALESCE($2, phone),
                avatar_url = COALESCE($3, avatar_url),
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&req.full_name)
        .bind(phone)
        .bind(&req.avatar_url)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CampingError::NotFound(format!("profile {}", id)))
    }
}

pub struct TokenRepository;

impl TokenRepository {
    pub async fn store(
        pool: &PgPool,
        profile_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), CampingError> {
        sqlx::query(
            "INSERT INTO refresh_tokens (profile_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(profile_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Revoke a live token and return its owner
    /// DOCUMENTATION: Atomic, so a refresh token can be rotated exactly once
    pub async fn consume(pool: &PgPool, token_hash: &str) -> Result<Option<Uuid>, CampingError> {
        let owner = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = NOW()
            WHERE token_hash = $1 AND revoked_at IS NULL AND expires_at > NOW()
            RETURNING profile_id
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;
        Ok(owner)
    }

    pub async fn revoke(pool: &PgPool, token_hash: &str) -> Result<(), CampingError> {
        sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Drop expired and revoked tokens; returns rows removed
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, CampingError> {
        let result = sqlx::query(
            "DELETE FROM refresh_tokens WHERE expires_at < NOW() OR revoked_at < NOW() - INTERVAL '1 day'",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
