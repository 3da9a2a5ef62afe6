//! API DTOs (Data Transfer Objects)

use kernel::error::app_error::{AppError, AppResult};
use kernel::error::envelope::FieldError;
use serde::{Deserialize, Serialize};

use crate::domain::entity::admin::AdminProfile;
use crate::domain::value_object::email::Email;

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Field-level validation, one entry per offending field
    pub fn validate(&self) -> AppResult<()> {
        let mut details = Vec::new();

        if self.email.trim().is_empty() {
            details.push(FieldError::new("email", "Email is required"));
        } else if Email::new(&self.email).is_err() {
            details.push(FieldError::new("email", "Invalid email format"));
        }

        if self.password.is_empty() {
            details.push(FieldError::new("password", "Password cannot be empty"));
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(details))
        }
    }
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminProfile,
}

// ============================================================================
// Current admin
// ============================================================================

/// `GET /auth/me` response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub admin: AdminProfile,
}
