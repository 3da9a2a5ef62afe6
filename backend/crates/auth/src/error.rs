//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
///
/// The 401 family deliberately keeps distinct variants even where the
/// client-visible status is identical: the middleware logs them at
/// different severities and the expired/invalid split drives different
/// client messages.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable bearer token on a protected route
    #[error("Authentication required. Please login.")]
    AuthenticationRequired,

    /// Wrong password or unknown email; never says which
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Token was valid once but is past its expiry
    #[error("Your session has expired. Please login again.")]
    TokenExpired,

    /// Token structure or signature is broken
    #[error("Invalid authentication token. Please login again.")]
    TokenInvalid,

    /// Token verified but its subject no longer exists
    #[error("Admin account not found.")]
    AccountNotFound,

    /// Password rejected by the strength policy
    #[error("Password does not meet the strength policy: {0}")]
    WeakPassword(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::AuthenticationRequired
            | AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::AccountNotFound => ErrorKind::Unauthorized,
            AuthError::WeakPassword(_) => ErrorKind::ValidationFailed,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable machine code carried in the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            AuthError::WeakPassword(_) => "VALIDATION_FAILED",
            AuthError::Database(_) | AuthError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string()).with_code(self.code())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::TokenExpired => {
                tracing::debug!("Expired token presented");
            }
            AuthError::TokenInvalid => {
                tracing::warn!("Malformed or tampered token presented");
            }
            AuthError::AccountNotFound => {
                tracing::warn!("Token subject no longer exists");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        err.to_app_error()
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
