//! Squeak Error Types
//!
//! Service-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::entity::session_token::RejectionReason;
use crate::domain::repository::DuplicateFields;

/// Squeak-specific result type alias
pub type SqueakResult<T> = Result<T, SqueakError>;

/// Squeak-specific error variants
#[derive(Debug, Error)]
pub enum SqueakError {
    /// Malformed payload or field that fails validation
    #[error("{0}")]
    Validation(String),

    /// Username and/or email already registered
    #[error("Already registered: {0}")]
    Duplicate(DuplicateFields),

    /// Unknown username
    #[error("Account not found")]
    AccountNotFound,

    /// Unknown user or wrong password (deliberately indistinguishable)
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No token in the cookie or the Authorization header
    #[error("Authentication required")]
    MissingToken,

    /// Token failed validation
    #[error("Authentication required")]
    TokenRejected(RejectionReason),

    /// Token is valid but its subject no longer resolves to an account
    #[error("Authentication required")]
    UnknownSubject(String),

    /// Valid token used against another user's resource
    #[error("Not allowed to post as this user")]
    Forbidden { subject: String, target: String },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SqueakError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SqueakError::Validation(_) => ErrorKind::BadRequest,
            SqueakError::Duplicate(_) => ErrorKind::Conflict,
            SqueakError::AccountNotFound => ErrorKind::NotFound,
            SqueakError::InvalidCredentials
            | SqueakError::MissingToken
            | SqueakError::TokenRejected(_)
            | SqueakError::UnknownSubject(_) => ErrorKind::Unauthorized,
            SqueakError::Forbidden { .. } => ErrorKind::Forbidden,
            SqueakError::Database(_) | SqueakError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Backend detail is kept as the source and never reaches the message.
    pub fn into_app_error(self) -> AppError {
        match self {
            SqueakError::Database(e) => AppError::from(e),
            SqueakError::Internal(_) => AppError::internal("Internal server error"),
            SqueakError::Duplicate(fields) => {
                let message = format!("Already registered: {}", fields);
                AppError::conflict(message)
                    .with_details(serde_json::json!({ "fields": fields.names() }))
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            SqueakError::Database(e) => {
                tracing::error!(error = %e, "Squeak database error");
            }
            SqueakError::Internal(msg) => {
                tracing::error!(message = %msg, "Squeak internal error");
            }
            SqueakError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            SqueakError::TokenRejected(reason) => {
                tracing::warn!(reason = %reason, "Bearer token rejected");
            }
            SqueakError::UnknownSubject(subject) => {
                tracing::warn!(subject = %subject, "Token subject does not resolve to an account");
            }
            SqueakError::Forbidden { subject, target } => {
                tracing::warn!(
                    subject = %subject,
                    target = %target,
                    "Post attempted on another user's feed"
                );
            }
            _ => {
                tracing::debug!(error = %self, "Squeak error");
            }
        }
    }
}

impl IntoResponse for SqueakError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<JsonRejection> for SqueakError {
    fn from(rejection: JsonRejection) -> Self {
        SqueakError::Validation(rejection.body_text())
    }
}

impl From<platform::crypto::CryptoError> for SqueakError {
    fn from(err: platform::crypto::CryptoError) -> Self {
        SqueakError::Internal(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for SqueakError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        SqueakError::Internal(err.to_string())
    }
}

impl From<platform::password::PasswordPolicyError> for SqueakError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        SqueakError::Validation(err.to_string())
    }
}
