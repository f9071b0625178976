//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion into the mobile API's
//! `{ "msg": ..., "code": ... }` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::types::MessageResponse;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Email or password is incorrect.")]
    AuthFailed,

    #[error(
        "Due to multiple login failures, the account is temporarily locked. \
         Please try again after {minutes} minutes."
    )]
    AuthLockedOut { minutes: i64 },

    // Retirement
    #[error("Account is already being retired.")]
    AlreadyRetiring,

    #[error("The user \"{0}\" does not exist.")]
    UserNotFound(String),

    /// Lookup by internal id; the id stays out of the message
    #[error("The user does not exist.")]
    AccountNotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Notification delivery failed: {0}")]
    Notification(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthFailed | AppError::AuthLockedOut { .. } => StatusCode::FORBIDDEN,
            AppError::AlreadyRetiring | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UserNotFound(_) | AppError::AccountNotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Notification(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!(error = ?e, "Database error");
                "A database error occurred. Please try again.".to_string()
            }
            AppError::Jwt(e) => {
                tracing::error!(error = ?e, "JWT error");
                "Invalid or expired token".to_string()
            }
            AppError::Notification(msg) => {
                tracing::error!(error = %msg, "Notification error reached the boundary");
                "An internal error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// True when a retry of the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::AuthFailed)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(
                status = status.as_u16(),
                retryable = self.is_retryable(),
                "Request failed"
            );
        }
        let body = MessageResponse::new(self.user_message(), status.as_u16());

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn user_not_found(username: impl Into<String>) -> Self {
        AppError::UserNotFound(username.into())
    }

    pub fn notification(msg: impl Into<String>) -> Self {
        AppError::Notification(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
