//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Lookups return `Option`; services decide what a miss means.

use kernel::error::app_error::AppResult;
use kernel::pagination::Page;
use serde::Serialize;

use crate::domain::entity::blog_post::{BlogPost, BlogStatus};
use crate::domain::entity::consultation_request::{ConsultationRequest, ConsultationStatus};
use crate::domain::entity::setting::Setting;
use crate::domain::entity::waitlist_entry::WaitlistEntry;

// ============================================================================
// Blog
// ============================================================================

/// Blog post counters for the admin dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    pub total: u64,
    pub published: u64,
    pub drafts: u64,
    pub total_views: u64,
}

/// Blog repository trait
#[trait_variant::make(BlogRepository: Send)]
pub trait LocalBlogRepository {
    /// Insert a post, returning the assigned id
    async fn create(&self, post: &BlogPost) -> AppResult<i64>;

    /// Published posts, newest publication first
    async fn list_published(
        &self,
        page: Page,
        featured: Option<bool>,
        category: Option<&str>,
    ) -> AppResult<(Vec<BlogPost>, u64)>;

    /// All posts for the admin view, newest creation first
    async fn list_all(
        &self,
        page: Page,
        status: Option<BlogStatus>,
        featured: Option<bool>,
    ) -> AppResult<(Vec<BlogPost>, u64)>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<BlogPost>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<BlogPost>>;

    /// Bump the view counter
    async fn increment_views(&self, id: i64) -> AppResult<()>;

    /// Persist a modified post; false when the id does not exist
    async fn update(&self, post: &BlogPost) -> AppResult<bool>;

    /// Delete; false when the id does not exist
    async fn delete(&self, id: i64) -> AppResult<bool>;

    async fn stats(&self) -> AppResult<BlogStats>;
}

// ============================================================================
// Waitlist
// ============================================================================

/// Waitlist counters for the admin dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistStats {
    pub total: u64,
    pub notified: u64,
    pub pending: u64,
}

/// Waitlist repository trait
#[trait_variant::make(WaitlistRepository: Send)]
pub trait LocalWaitlistRepository {
    /// Insert an entry, returning the assigned id. A duplicate email
    /// surfaces as a duplicate-entry error from the storage layer.
    async fn create(&self, entry: &WaitlistEntry) -> AppResult<i64>;

    async fn list(
        &self,
        page: Page,
        notified: Option<bool>,
    ) -> AppResult<(Vec<WaitlistEntry>, u64)>;

    /// Every matching entry, for CSV export
    async fn list_all(&self, notified: Option<bool>) -> AppResult<Vec<WaitlistEntry>>;

    /// Flag an entry as notified; None when the id does not exist
    async fn mark_notified(&self, id: i64) -> AppResult<Option<WaitlistEntry>>;

    /// Delete; false when the id does not exist
    async fn delete(&self, id: i64) -> AppResult<bool>;

    async fn stats(&self) -> AppResult<WaitlistStats>;
}

// ============================================================================
// Consultations
// ============================================================================

/// Consultation counters for the admin dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationStats {
    pub total: u64,
    pub pending: u64,
    pub contacted: u64,
    pub converted: u64,
    pub new_this_month: u64,
}

/// Consultation repository trait
#[trait_variant::make(ConsultationRepository: Send)]
pub trait LocalConsultationRepository {
    /// Insert a request, returning the assigned id
    async fn create(&self, request: &ConsultationRequest) -> AppResult<i64>;

    async fn list(
        &self,
        page: Page,
        status: Option<ConsultationStatus>,
    ) -> AppResult<(Vec<ConsultationRequest>, u64)>;

    /// Every matching request, for CSV export
    async fn list_all(
        &self,
        status: Option<ConsultationStatus>,
    ) -> AppResult<Vec<ConsultationRequest>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ConsultationRequest>>;

    /// Update status and notes; None when the id does not exist
    async fn update_status(
        &self,
        id: i64,
        status: ConsultationStatus,
        admin_notes: Option<String>,
    ) -> AppResult<Option<ConsultationRequest>>;

    async fn stats(&self) -> AppResult<ConsultationStats>;
}

// ============================================================================
// Settings
// ============================================================================

/// Settings repository trait
#[trait_variant::make(SettingsRepository: Send)]
pub trait LocalSettingsRepository {
    async fn list_all(&self) -> AppResult<Vec<Setting>>;

    async fn find(&self, key: &str) -> AppResult<Option<Setting>>;

    /// Insert or replace a setting
    async fn upsert(&self, setting: &Setting) -> AppResult<()>;

    /// Delete; false when the key does not exist
    async fn delete(&self, key: &str) -> AppResult<bool>;
}
