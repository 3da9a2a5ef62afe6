//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use kernel::error::app_error::{AppError, AppResult};
use kernel::error::envelope::ApiResponse;
use kernel::pagination::{PageQuery, PaginationMeta};
use platform::client::{ClientIp, rate_limit_key};
use platform::rate_limit::{RateLimitConfig, RateLimitStore};

use auth::MaybeAuth;

use crate::application::blog::BlogService;
use crate::application::consultation::ConsultationService;
use crate::application::export::export_filename;
use crate::application::settings::SettingsService;
use crate::application::waitlist::WaitlistService;
use crate::domain::entity::blog_post::BlogStatus;
use crate::domain::entity::consultation_request::ConsultationStatus;
use crate::domain::repository::{
    BlogRepository, ConsultationRepository, SettingsRepository, WaitlistRepository,
};
use crate::presentation::dto::{
    AdminBlogQuery, BlogListResponse, BlogPostDto, BulkSettingsRequest, ConsultationDto,
    ConsultationExportQuery, ConsultationListResponse, ConsultationQuery,
    ConsultationSubmitRequest, CreateBlogRequest, PublicBlogQuery, SettingDto,
    UpdateBlogRequest, UpdateConsultationStatusRequest, UpsertSettingRequest,
    WaitlistEntryDto, WaitlistExportQuery, WaitlistListResponse, WaitlistQuery,
    WaitlistSignupRequest,
};

/// Everything a content handler needs from its backing store
pub trait ContentStore:
    BlogRepository
    + WaitlistRepository
    + ConsultationRepository
    + SettingsRepository
    + RateLimitStore
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> ContentStore for T where
    T: BlogRepository
        + WaitlistRepository
        + ConsultationRepository
        + SettingsRepository
        + RateLimitStore
        + Clone
        + Send
        + Sync
        + 'static
{
}

/// Shared state for content handlers
#[derive(Clone)]
pub struct ContentAppState<R>
where
    R: ContentStore,
{
    pub repo: Arc<R>,
    /// Rate limit applied to the public submission forms
    pub form_rate_limit: RateLimitConfig,
}

impl<R> ContentAppState<R>
where
    R: ContentStore,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            form_rate_limit: RateLimitConfig::form(),
        }
    }

    pub fn with_form_rate_limit(mut self, limit: RateLimitConfig) -> Self {
        self.form_rate_limit = limit;
        self
    }
}

/// Enforce a public-form rate limit for the calling client
async fn enforce_form_limit<R>(
    state: &ContentAppState<R>,
    scope: &str,
    client_ip: ClientIp,
) -> AppResult<()>
where
    R: ContentStore,
{
    let ClientIp(client_ip) = client_ip;
    let key = rate_limit_key(client_ip);

    let result = state
        .repo
        .check_and_increment(scope, &key, &state.form_rate_limit)
        .await
        .map_err(|e| AppError::internal(format!("Rate limit check failed: {e}")))?;

    if !result.allowed {
        tracing::warn!(scope = scope, ip = ?client_ip, "Form rate limit exceeded");
        return Err(AppError::rate_limited(
            "Too many submissions. Please try again later.",
            result.retry_after_secs(Utc::now().timestamp_millis()),
        ));
    }

    Ok(())
}

/// Build a CSV attachment response, named by the current date
fn csv_response(scope: &str, csv: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export_filename(scope)),
            ),
        ],
        csv,
    )
        .into_response()
}

// ============================================================================
// Blog (public)
// ============================================================================

/// GET /blog
pub async fn list_blog<R>(
    State(state): State<ContentAppState<R>>,
    Query(query): Query<PublicBlogQuery>,
) -> AppResult<Json<ApiResponse<BlogListResponse>>>
where
    R: ContentStore,
{
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve(10);

    let service = BlogService::new(state.repo.clone());
    let (posts, total) = service
        .list_published(page, query.featured, query.category.as_deref())
        .await?;

    Ok(Json(ApiResponse::new(BlogListResponse {
        posts: posts.into_iter().map(BlogPostDto::from).collect(),
        pagination: PaginationMeta::new(page, total),
    })))
}

/// GET /blog/{slug}
///
/// With a resolved admin context (optional auth), drafts are visible;
/// anonymous callers get 404 for anything unpublished.
pub async fn get_blog_by_slug<R>(
    State(state): State<ContentAppState<R>>,
    Path(slug): Path<String>,
    MaybeAuth(ctx): MaybeAuth,
) -> AppResult<Json<ApiResponse<BlogPostDto>>>
where
    R: ContentStore,
{
    let service = BlogService::new(state.repo.clone());
    let post = service.get_by_slug(&slug, ctx.is_some()).await?;

    Ok(Json(ApiResponse::new(BlogPostDto::from(post))))
}

// ============================================================================
// Blog (admin)
// ============================================================================

/// GET /admin/blog
pub async fn admin_list_blog<R>(
    State(state): State<ContentAppState<R>>,
    Query(query): Query<AdminBlogQuery>,
) -> AppResult<Json<ApiResponse<BlogListResponse>>>
where
    R: ContentStore,
{
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve(20);

    let status = query.status.as_deref().map(BlogStatus::parse).transpose()?;

    let service = BlogService::new(state.repo.clone());
    let (posts, total) = service.list_all(page, status, query.featured).await?;

    Ok(Json(ApiResponse::new(BlogListResponse {
        posts: posts.into_iter().map(BlogPostDto::from).collect(),
        pagination: PaginationMeta::new(page, total),
    })))
}

/// POST /admin/blog
pub async fn admin_create_blog<R>(
    State(state): State<ContentAppState<R>>,
    Json(req): Json<CreateBlogRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BlogPostDto>>)>
where
    R: ContentStore,
{
    let input = req.into_input()?;
    let service = BlogService::new(state.repo.clone());
    let post = service.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(BlogPostDto::from(post)).with_message("Blog post created")),
    ))
}

/// GET /admin/blog/{id}
pub async fn admin_get_blog<R>(
    State(state): State<ContentAppState<R>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<BlogPostDto>>>
where
    R: ContentStore,
{
    let service = BlogService::new(state.repo.clone());
    let post = service.get_by_id(id).await?;

    Ok(Json(ApiResponse::new(BlogPostDto::from(post))))
}

/// PUT /admin/blog/{id}
pub async fn admin_update_blog<R>(
    State(state): State<ContentAppState<R>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBlogRequest>,
) -> AppResult<Json<ApiResponse<BlogPostDto>>>
where
    R: ContentStore,
{
    let input = req.into_input()?;
    let service = BlogService::new(state.repo.clone());
    let post = service.update(id, input).await?;

    Ok(Json(
        ApiResponse::new(BlogPostDto::from(post)).with_message("Blog post updated"),
    ))
}

/// DELETE /admin/blog/{id}
pub async fn admin_delete_blog<R>(
    State(state): State<ContentAppState<R>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>>
where
    R: ContentStore,
{
    let service = BlogService::new(state.repo.clone());
    service.delete(id).await?;

    Ok(Json(
        ApiResponse::new(serde_json::json!({ "id": id })).with_message("Blog post deleted"),
    ))
}

// ============================================================================
// Waitlist (public)
// ============================================================================

/// POST /waitlist
pub async fn waitlist_signup<R>(
    State(state): State<ContentAppState<R>>,
    client_ip: ClientIp,
    Json(req): Json<WaitlistSignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<WaitlistEntryDto>>)>
where
    R: ContentStore,
{
    enforce_form_limit(&state, "waitlist", client_ip).await?;

    let input = req.into_input()?;
    let service = WaitlistService::new(state.repo.clone());
    let entry = service.signup(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(WaitlistEntryDto::from(entry)).with_message("You're on the list")),
    ))
}

// ============================================================================
// Waitlist (admin)
// ============================================================================

/// GET /admin/waitlist
pub async fn admin_list_waitlist<R>(
    State(state): State<ContentAppState<R>>,
    Query(query): Query<WaitlistQuery>,
) -> AppResult<Json<ApiResponse<WaitlistListResponse>>>
where
    R: ContentStore,
{
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve(50);

    let service = WaitlistService::new(state.repo.clone());
    let (entries, total) = service.list(page, query.notified).await?;

    Ok(Json(ApiResponse::new(WaitlistListResponse {
        entries: entries.into_iter().map(WaitlistEntryDto::from).collect(),
        pagination: PaginationMeta::new(page, total),
    })))
}

/// PATCH /admin/waitlist/{id}/notified
pub async fn admin_notify_waitlist<R>(
    State(state): State<ContentAppState<R>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<WaitlistEntryDto>>>
where
    R: ContentStore,
{
    let service = WaitlistService::new(state.repo.clone());
    let entry = service.mark_notified(id).await?;

    Ok(Json(
        ApiResponse::new(WaitlistEntryDto::from(entry)).with_message("Entry marked as notified"),
    ))
}

/// DELETE /admin/waitlist/{id}
pub async fn admin_delete_waitlist<R>(
    State(state): State<ContentAppState<R>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>>
where
    R: ContentStore,
{
    let service = WaitlistService::new(state.repo.clone());
    service.delete(id).await?;

    Ok(Json(
        ApiResponse::new(serde_json::json!({ "id": id })).with_message("Waitlist entry deleted"),
    ))
}

/// GET /admin/waitlist/export
pub async fn admin_export_waitlist<R>(
    State(state): State<ContentAppState<R>>,
    Query(query): Query<WaitlistExportQuery>,
) -> AppResult<Response>
where
    R: ContentStore,
{
    let service = WaitlistService::new(state.repo.clone());
    let csv = service.export_csv(query.notified).await?;

    Ok(csv_response("waitlist", csv))
}

// ============================================================================
// Consultations (public)
// ============================================================================

/// POST /consultations
pub async fn consultation_submit<R>(
    State(state): State<ContentAppState<R>>,
    client_ip: ClientIp,
    Json(req): Json<ConsultationSubmitRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ConsultationDto>>)>
where
    R: ContentStore,
{
    enforce_form_limit(&state, "consultation", client_ip).await?;

    let input = req.into_input()?;
    let service = ConsultationService::new(state.repo.clone());
    let request = service.submit(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::new(ConsultationDto::from(request))
                .with_message("Consultation request received"),
        ),
    ))
}

// ============================================================================
// Consultations (admin)
// ============================================================================

/// GET /admin/consultations
pub async fn admin_list_consultations<R>(
    State(state): State<ContentAppState<R>>,
    Query(query): Query<ConsultationQuery>,
) -> AppResult<Json<ApiResponse<ConsultationListResponse>>>
where
    R: ContentStore,
{
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve(50);

    let status = query
        .status
        .as_deref()
        .map(ConsultationStatus::parse)
        .transpose()?;

    let service = ConsultationService::new(state.repo.clone());
    let (consultations, total) = service.list(page, status).await?;

    Ok(Json(ApiResponse::new(ConsultationListResponse {
        consultations: consultations.into_iter().map(ConsultationDto::from).collect(),
        pagination: PaginationMeta::new(page, total),
    })))
}

/// GET /admin/consultations/{id}
pub async fn admin_get_consultation<R>(
    State(state): State<ContentAppState<R>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ConsultationDto>>>
where
    R: ContentStore,
{
    let service = ConsultationService::new(state.repo.clone());
    let request = service.get_by_id(id).await?;

    Ok(Json(ApiResponse::new(ConsultationDto::from(request))))
}

/// PATCH /admin/consultations/{id}/status
pub async fn admin_update_consultation<R>(
    State(state): State<ContentAppState<R>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateConsultationStatusRequest>,
) -> AppResult<Json<ApiResponse<ConsultationDto>>>
where
    R: ContentStore,
{
    let status = req.parse_status()?;
    let service = ConsultationService::new(state.repo.clone());
    let request = service.update_status(id, status, req.admin_notes).await?;

    Ok(Json(
        ApiResponse::new(ConsultationDto::from(request)).with_message("Status updated"),
    ))
}

/// GET /admin/consultations/export
pub async fn admin_export_consultations<R>(
    State(state): State<ContentAppState<R>>,
    Query(query): Query<ConsultationExportQuery>,
) -> AppResult<Response>
where
    R: ContentStore,
{
    let status = query
        .status
        .as_deref()
        .map(ConsultationStatus::parse)
        .transpose()?;

    let service = ConsultationService::new(state.repo.clone());
    let csv = service.export_csv(status).await?;

    Ok(csv_response("consultations", csv))
}

// ============================================================================
// Settings (admin)
// ============================================================================

/// GET /admin/settings
///
/// Keyed map shape for the dashboard: `{ "<key>": { value, type,
/// description }, ... }`.
pub async fn admin_get_settings<R>(
    State(state): State<ContentAppState<R>>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>>
where
    R: ContentStore,
{
    let service = SettingsService::new(state.repo.clone());
    let settings = service.all().await?;

    let mut map = serde_json::Map::new();
    for setting in settings {
        map.insert(
            setting.key.clone(),
            serde_json::json!({
                "value": setting.value,
                "type": setting.value_type,
                "description": setting.description,
            }),
        );
    }

    Ok(Json(ApiResponse::new(serde_json::Value::Object(map))))
}

/// GET /admin/settings/{key}
pub async fn admin_get_setting<R>(
    State(state): State<ContentAppState<R>>,
    Path(key): Path<String>,
) -> AppResult<Json<ApiResponse<SettingDto>>>
where
    R: ContentStore,
{
    let service = SettingsService::new(state.repo.clone());
    let setting = service.get(&key).await?;

    Ok(Json(ApiResponse::new(SettingDto::from(setting))))
}

/// PUT /admin/settings/{key}
pub async fn admin_put_setting<R>(
    State(state): State<ContentAppState<R>>,
    Path(key): Path<String>,
    Json(req): Json<UpsertSettingRequest>,
) -> AppResult<Json<ApiResponse<SettingDto>>>
where
    R: ContentStore,
{
    let service = SettingsService::new(state.repo.clone());
    let setting = service
        .upsert(&key, req.value, req.value_type, req.description)
        .await?;

    Ok(Json(
        ApiResponse::new(SettingDto::from(setting)).with_message("Setting saved"),
    ))
}

/// PUT /admin/settings
pub async fn admin_put_settings<R>(
    State(state): State<ContentAppState<R>>,
    Json(req): Json<BulkSettingsRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>>
where
    R: ContentStore,
{
    req.validate()?;

    let entries = req
        .settings
        .into_iter()
        .map(|e| (e.key, e.value))
        .collect::<Vec<_>>();
    let count = entries.len();

    let service = SettingsService::new(state.repo.clone());
    service.upsert_many(entries).await?;

    Ok(Json(
        ApiResponse::new(serde_json::json!({ "updated": count }))
            .with_message("Settings updated successfully"),
    ))
}

/// DELETE /admin/settings/{key}
pub async fn admin_delete_setting<R>(
    State(state): State<ContentAppState<R>>,
    Path(key): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>>
where
    R: ContentStore,
{
    let service = SettingsService::new(state.repo.clone());
    service.delete(&key).await?;

    Ok(Json(
        ApiResponse::new(serde_json::json!({ "key": key })).with_message("Setting deleted"),
    ))
}
