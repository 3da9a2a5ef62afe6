//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, State};
use chrono::Utc;

use kernel::error::app_error::{AppError, AppResult};
use kernel::error::envelope::ApiResponse;
use platform::client::{ClientIp, rate_limit_key};
use platform::rate_limit::RateLimitStore;

use crate::application::config::AuthConfig;
use crate::application::login::{LoginInput, LoginUseCase};
use crate::application::token::TokenService;
use crate::domain::repository::AdminRepository;
use crate::presentation::dto::{LoginRequest, LoginResponse, MeResponse};
use crate::presentation::middleware::AuthContext;

/// Rate-limit scope for the login endpoint
const LOGIN_RATE_SCOPE: &str = "login";

/// Shared state for auth handlers and middleware
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AdminRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
}

impl<R> AuthAppState<R>
where
    R: AdminRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        let tokens = Arc::new(TokenService::new(&config));
        Self {
            repo,
            config,
            tokens,
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ClientIp(client_ip): ClientIp,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>>
where
    R: AdminRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    // Brute-force guard runs before anything touches the credential store
    let key = rate_limit_key(client_ip);
    let limit = state
        .repo
        .check_and_increment(LOGIN_RATE_SCOPE, &key, &state.config.login_rate_limit)
        .await
        .map_err(|e| AppError::internal(format!("Rate limit check failed: {e}")))?;

    if !limit.allowed {
        tracing::warn!(ip = ?client_ip, "Login rate limit exceeded");
        let retry_after = limit.retry_after_secs(Utc::now().timestamp_millis());
        return Err(AppError::rate_limited(
            "Too many login attempts. Please try again later.",
            retry_after,
        ));
    }

    req.validate()?;

    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(
        ApiResponse::new(LoginResponse {
            token: output.token,
            admin: output.admin,
        })
        .with_message("Login successful"),
    ))
}

// ============================================================================
// Current admin
// ============================================================================

/// GET /auth/me (requires authentication)
///
/// The middleware already verified the token and resolved the admin;
/// this only echoes the request context back out.
pub async fn me(Extension(ctx): Extension<AuthContext>) -> Json<ApiResponse<MeResponse>> {
    Json(ApiResponse::new(MeResponse { admin: ctx.admin }))
}
