//! Login Use Case
//!
//! Authenticates the administrator and issues a bearer token.

use std::sync::Arc;

use chrono::Utc;
use platform::password::{self, ClearTextPassword};

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::entity::admin::AdminProfile;
use crate::domain::repository::AdminRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed bearer token
    pub token: String,
    /// Redacted administrator profile
    pub admin: AdminProfile,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: AdminRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
}

impl<R> LoginUseCase<R>
where
    R: AdminRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, tokens: Arc<TokenService>) -> Self {
        Self {
            repo,
            config,
            tokens,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password = ClearTextPassword::for_login(input.password)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let found = self.repo.find_by_email(&email).await?;

        // The hash comparison runs on every attempt. A lookup miss is
        // verified against the per-process dummy hash so the unknown-email
        // and wrong-password paths take indistinguishable time.
        let hash = match &found {
            Some(admin) => admin.password_hash.clone(),
            None => self.config.dummy_hash().clone(),
        };
        let password_valid = password::verify_async(password, hash)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // One uniform failure for "no such account" and "wrong password"
        let mut admin = match found {
            Some(admin) if password_valid => admin,
            _ => return Err(AuthError::InvalidCredentials),
        };

        // Best effort: a failed timestamp write must not fail the login
        let now = Utc::now();
        match self.repo.update_last_login(admin.id, now).await {
            Ok(()) => admin.last_login_at = Some(now),
            Err(e) => {
                tracing::warn!(error = %e, admin_id = admin.id, "Failed to record last login");
            }
        }

        let token = self.tokens.issue(admin.id, admin.email.as_str())?;

        tracing::info!(admin_id = admin.id, "Admin signed in");

        Ok(LoginOutput {
            token,
            admin: admin.redact(),
        })
    }
}
