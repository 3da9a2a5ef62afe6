//! Auth Middleware
//!
//! Middleware for protecting authenticated routes and the optional-auth
//! variant for routes that serve both anonymous and admin callers.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::current_admin::CurrentAdminUseCase;
use crate::application::token::Claims;
use crate::domain::entity::admin::AdminProfile;
use crate::domain::repository::AdminRepository;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;
use platform::rate_limit::RateLimitStore;

/// Request-scoped identity context
///
/// Inserted into request extensions once a bearer token has verified
/// and its subject resolved; dropped with the request.
#[derive(Clone)]
pub struct AuthContext {
    /// Redacted administrator profile
    pub admin: AdminProfile,
    /// Raw verified claims
    pub claims: Claims,
}

/// Extractor for routes that behave differently for administrators
/// but never require one
///
/// Yields whatever context the optional-auth middleware resolved;
/// extraction never fails, so the same handler serves anonymous
/// callers and routers mounted without the middleware.
#[derive(Clone)]
pub struct MaybeAuth(pub Option<AuthContext>);

impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<AuthContext>().cloned()))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// Any other form (missing header, other scheme, empty token) is
/// treated as absent.
fn bearer_token(req: &Request<Body>) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Middleware that requires a valid bearer token
///
/// Rejects with 401 before any handler runs when the header is absent,
/// the token fails verification, or the token's subject no longer
/// exists. The credential store is only consulted after the token has
/// cryptographically verified.
pub async fn require_auth<R>(
    state: AuthAppState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: AdminRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    let token = match bearer_token(&req) {
        Some(token) => token,
        None => return Err(AuthError::AuthenticationRequired.into_response()),
    };

    let claims = match state.tokens.verify(&token) {
        Ok(claims) => claims,
        Err(e) => return Err(AuthError::from(e).into_response()),
    };

    let admin_id = match claims.admin_id() {
        Ok(id) => id,
        Err(e) => return Err(AuthError::from(e).into_response()),
    };

    let use_case = CurrentAdminUseCase::new(state.repo.clone());
    let admin = match use_case.get(admin_id).await {
        Ok(profile) => profile,
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(AuthContext { admin, claims });

    Ok(next.run(req).await)
}

/// Middleware that accepts but does not require a bearer token
///
/// Used by routes that reveal more to administrators (e.g. unpublished
/// blog posts). Every failure in the chain falls back to anonymous
/// silently; the context is only inserted on full success.
pub async fn optional_auth<R>(state: AuthAppState<R>, mut req: Request<Body>, next: Next) -> Response
where
    R: AdminRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    if let Some(token) = bearer_token(&req) {
        if let Ok(claims) = state.tokens.verify(&token) {
            if let Ok(admin_id) = claims.admin_id() {
                let use_case = CurrentAdminUseCase::new(state.repo.clone());
                if let Ok(admin) = use_case.get(admin_id).await {
                    req.extensions_mut().insert(AuthContext { admin, claims });
                }
            }
        }
    }

    next.run(req).await
}
