//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication
    #[error("Authentication required")]
    Unauthorized,

    /// Unknown name or wrong password. The two are indistinguishable to callers.
    #[error("Invalid name or password")]
    AuthenticationFailed,

    /// Refresh token failed signature, expiry or format checks.
    #[error("Invalid or expired refresh token")]
    InvalidToken,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// No refresh token stored for the member.
    #[error("Member is logged out")]
    SessionNotFound,

    /// Presented refresh token is not the one currently stored.
    #[error("Refresh token does not match the active session")]
    TokenMismatch,

    // Resource errors
    #[error("{0} already exists")]
    DuplicateIdentity(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::MalformedToken => "MALFORMED_TOKEN",
            AppError::ExpiredToken => "EXPIRED_TOKEN",
            AppError::SessionNotFound => "SESSION_NOT_FOUND",
            AppError::TokenMismatch => "TOKEN_MISMATCH",
            AppError::DuplicateIdentity(_) => "DUPLICATE_IDENTITY",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized
            | AppError::AuthenticationFailed
            | AppError::InvalidToken
            | AppError::MalformedToken
            | AppError::ExpiredToken
            | AppError::SessionNotFound
            | AppError::TokenMismatch => StatusCode::UNAUTHORIZED,
            AppError::DuplicateIdentity(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),

            // Hide details for internal errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Translate a failed member insert, treating a unique violation on the
    /// name as a duplicate signup.
    pub fn from_insert(err: DbErr, name: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateIdentity(name.to_string()),
            _ => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn duplicate(name: impl Into<String>) -> Self {
        AppError::DuplicateIdentity(name.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_family_is_unauthorized() {
        for err in [
            AppError::InvalidToken,
            AppError::MalformedToken,
            AppError::ExpiredToken,
            AppError::SessionNotFound,
            AppError::TokenMismatch,
            AppError::AuthenticationFailed,
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let err = AppError::duplicate("alice");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.user_message(), "alice already exists");
    }

    #[test]
    fn test_internal_message_hidden() {
        let err = AppError::internal("signing key exploded");
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_non_unique_insert_error_stays_database() {
        let err = AppError::from_insert(DbErr::Custom("boom".into()), "alice");
        assert!(matches!(err, AppError::Database(_)));
    }
}
