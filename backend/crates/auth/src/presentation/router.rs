//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};

use platform::rate_limit::RateLimitStore;

use crate::domain::repository::AdminRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware;

/// Create the auth router for any repository implementation
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: AdminRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    let mw_state = state.clone();

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route(
            "/me",
            get(handlers::me).layer(axum::middleware::from_fn(
                move |req: axum::extract::Request, next: axum::middleware::Next| {
                    let state = mw_state.clone();
                    async move { middleware::require_auth(state, req, next).await }
                },
            )),
        )
        .with_state(state)
}
