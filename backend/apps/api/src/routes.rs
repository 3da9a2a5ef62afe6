//! API-level handlers and router assembly
//!
//! Health, liveness, admin stats, the upload boundary and the 404
//! fallback live here; everything else is nested from the auth and
//! content crates.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::Uri;
use axum::{Json, Router, routing::get, routing::post};
use serde::Serialize;
use sqlx::PgPool;

use kernel::error::app_error::{AppError, AppResult};
use kernel::error::envelope::ApiResponse;
use platform::storage::{HttpObjectStorage, ObjectStorage};

use content::PgContentRepository;
use content::application::blog::BlogService;
use content::application::consultation::ConsultationService;
use content::application::waitlist::WaitlistService;
use content::domain::repository::{BlogStats, ConsultationStats, WaitlistStats};

/// Image types the upload endpoint accepts
const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// State for the api-level routes
#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub content_repo: Arc<PgContentRepository>,
    pub storage: Option<HttpObjectStorage>,
}

/// Routes owned by the composition root itself
pub fn api_admin_router(state: ApiState) -> Router {
    Router::new()
        .route("/stats", get(admin_stats))
        .route("/upload", post(upload_image))
        .with_state(state)
}

// ============================================================================
// Liveness
// ============================================================================

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

/// GET /health
///
/// Pings the datastore so a green response means the whole path works.
pub async fn health(State(state): State<ApiState>) -> AppResult<Json<ApiResponse<HealthResponse>>> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .map_err(|e| AppError::service_unavailable("Database unreachable").with_source(e))?;

    Ok(Json(ApiResponse::new(HealthResponse {
        status: "ok",
        database: "connected",
    })))
}

/// GET /
pub async fn root() -> Json<ApiResponse<serde_json::Value>> {
    Json(
        ApiResponse::new(serde_json::json!({
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }))
        .with_message("API is running"),
    )
}

/// Fallback for unmatched routes: 404 echoing the requested path
pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route not found: {}", uri.path()))
}

// ============================================================================
// Admin stats
// ============================================================================

/// Hardcoded service tiles the dashboard expects
#[derive(Serialize)]
struct ServiceStats {
    active: u32,
    total: u32,
}

#[derive(Serialize)]
struct AdminStatsResponse {
    consultations: ConsultationStats,
    waitlist: WaitlistStats,
    blog: BlogStats,
    services: ServiceStats,
}

/// GET /admin/stats
async fn admin_stats(State(state): State<ApiState>) -> AppResult<Json<ApiResponse<AdminStatsResponse>>> {
    let consultations = ConsultationService::new(state.content_repo.clone())
        .stats()
        .await?;
    let waitlist = WaitlistService::new(state.content_repo.clone()).stats().await?;
    let blog = BlogService::new(state.content_repo.clone()).stats().await?;

    Ok(Json(ApiResponse::new(AdminStatsResponse {
        consultations,
        waitlist,
        blog,
        // The service catalog is static site content, not data
        services: ServiceStats { active: 6, total: 6 },
    })))
}

// ============================================================================
// Upload boundary
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    url: String,
    bytes: Option<u64>,
    content_type: Option<String>,
}

/// POST /admin/upload
///
/// Multipart form: `file` (required image), `folder` (optional label).
/// The bytes go straight to the configured asset host; only the public
/// URL comes back.
async fn upload_image(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    let storage = state
        .storage
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("Uploads are not configured"))?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut folder = "uploads".to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().unwrap_or("").to_string();
                if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
                    return Err(AppError::bad_request(
                        "Only jpeg, png, gif and webp images are accepted",
                    ));
                }
                let file_name = field
                    .file_name()
                    .unwrap_or("upload")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Could not read upload: {e}")))?;
                file = Some((file_name, data.to_vec()));
            }
            Some("folder") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Could not read folder: {e}")))?;
                if !value.trim().is_empty() {
                    folder = value.trim().to_string();
                }
            }
            _ => {}
        }
    }

    let (file_name, data) = file
        .ok_or_else(|| AppError::bad_request("Multipart field 'file' is required"))?;

    let object = storage
        .put(data, &file_name, &folder)
        .await
        .map_err(|e| AppError::internal("Upload to asset host failed").with_source(e))?;

    tracing::info!(url = %object.url, folder = %folder, "Image uploaded");

    Ok(Json(ApiResponse::new(UploadResponse {
        url: object.url,
        bytes: object.bytes,
        content_type: object.content_type,
    })))
}
