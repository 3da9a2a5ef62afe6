//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors go through `kernel::error::AppError`.

mod config;
mod middleware;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{AuthAppState, AuthConfig, PgAdminRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
    routing::get,
};
use content::application::settings::SettingsService;
use content::{ContentAppState, PgContentRepository};
use platform::storage::HttpObjectStorage;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;
use crate::routes::ApiState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,content=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail fast on configuration problems; a half-configured process
    // must never reach the listener
    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations").run(&pool).await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: drop stale rate-limit windows
    // Errors here should not prevent server startup
    let admin_repo = PgAdminRepository::new(pool.clone());
    match admin_repo.sweep_stale_rate_limits().await {
        Ok(deleted) => {
            tracing::info!(windows_deleted = deleted, "Rate limit sweep completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rate limit sweep failed, continuing anyway");
        }
    }

    // Idempotent settings defaults
    let content_repo = PgContentRepository::new(pool.clone());
    match SettingsService::new(Arc::new(content_repo.clone()))
        .initialize_defaults()
        .await
    {
        Ok(created) => {
            if created > 0 {
                tracing::info!(created = created, "Settings defaults created");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Settings initialization failed, continuing anyway");
        }
    }

    // Auth configuration (validates the secret and precomputes the
    // dummy hash; fatal on violation)
    let auth_config = AuthConfig::new(
        config.token_secret.clone(),
        config.token_ttl,
        config.bcrypt_cost,
    )?
    .with_login_rate_limit(config.login_rate.clone());

    let auth_state = AuthAppState::new(Arc::new(admin_repo), Arc::new(auth_config));

    let content_state = ContentAppState::new(Arc::new(content_repo.clone()))
        .with_form_rate_limit(config.form_rate.clone());

    let storage = config
        .uploads
        .as_ref()
        .map(|uploads| HttpObjectStorage::new(uploads.endpoint.clone(), uploads.api_key.clone()));
    if storage.is_none() {
        tracing::warn!("UPLOADS_URL not set; the upload endpoint will refuse requests");
    }

    let api_state = ApiState {
        pool: pool.clone(),
        content_repo: Arc::new(content_repo),
        storage,
    };

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Auth middleware bound to its state
    let optional_auth_state = auth_state.clone();
    let optional_auth_layer =
        axum::middleware::from_fn(move |req: axum::extract::Request, next: axum::middleware::Next| {
            let state = optional_auth_state.clone();
            async move { auth::presentation::middleware::optional_auth(state, req, next).await }
        });

    let require_auth_state = auth_state.clone();
    let require_auth_layer =
        axum::middleware::from_fn(move |req: axum::extract::Request, next: axum::middleware::Next| {
            let state = require_auth_state.clone();
            async move { auth::presentation::middleware::require_auth(state, req, next).await }
        });

    // Build router
    let admin = Router::new()
        .merge(content::admin_router(content_state.clone()))
        .merge(routes::api_admin_router(api_state.clone()))
        .layer(require_auth_layer);

    let v1 = Router::new()
        .nest("/auth", auth_router(auth_state))
        .nest("/admin", admin)
        .merge(content::public_router(content_state).layer(optional_auth_layer));

    let app = Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .with_state(api_state)
        .nest("/api/v1", v1)
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::request_context));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // Scoped release of the one shared resource
    pool.close().await;
    tracing::info!("Connection pool closed, shutdown complete");

    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
