// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to an HTTP status code and a JSON error envelope
#[derive(Error, Debug)]
pub enum CampingError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    InternalError,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl CampingError {
    fn code(&self) -> &'static str {
        match self {
            CampingError::NotFound(_) => "NOT_FOUND",
            CampingError::AlreadyExists(_) => "ALREADY_EXISTS",
            CampingError::DatabaseError(_) => "DATABASE_ERROR",
            CampingError::InvalidInput(_) => "INVALID_INPUT",
            CampingError::ValidationError(_) => "VALIDATION_ERROR",
            CampingError::Unauthorized(_) => "UNAUTHORIZED",
            CampingError::Forbidden(_) => "FORBIDDEN",
            CampingError::Conflict(_) => "CONFLICT",
            CampingError::InternalError => "INTERNAL_ERROR",
            CampingError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            CampingError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }

    /// Map a sqlx failure, turning unique violations on `constraint` into AlreadyExists
    pub fn from_unique(e: sqlx::Error, constraint: &str, what: &str) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.constraint() == Some(constraint) {
                return CampingError::AlreadyExists(what.to_string());
            }
        }
        log::error!("Database error ({}): {}", what, e);
        CampingError::DatabaseError(e.to_string())
    }
}

impl From<ValidationErrors> for CampingError {
    fn from(e: ValidationErrors) -> Self {
        CampingError::ValidationError(e.to_string())
    }
}

impl From<sqlx::Error> for CampingError {
    fn from(e: sqlx::Error) -> Self {
        log::error!("Database error: {}", e);
        CampingError::DatabaseError(e.to_string())
    }
}

/// Convert CampingError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for CampingError {
    fn error_response(&self) -> HttpResponse {
        // Database details stay in the logs
        let message = match self {
            CampingError::DatabaseError(_) => "Database error".to_string(),
            other => other.to_string(),
        };

        let body = json!({
            "error": {
                "code": self.code(),
                "message": message,
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            CampingError::NotFound(_) => StatusCode::NOT_FOUND,
            CampingError::AlreadyExists(_) => StatusCode::CONFLICT,
            CampingError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CampingError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CampingError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CampingError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CampingError::Forbidden(_) => StatusCode::FORBIDDEN,
            CampingError::Conflict(_) => StatusCode::CONFLICT,
            CampingError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            CampingError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            CampingError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CampingError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CampingError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CampingError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            CampingError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CampingError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_database_message_is_hidden() {
        let response = CampingError::DatabaseError("relation \"secret\" does not exist".into())
            .error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
