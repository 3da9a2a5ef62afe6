//! API DTOs (Data Transfer Objects)
//!
//! Every boundary shape is named and validated here; validation
//! failures carry one entry per offending field.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::error::envelope::FieldError;
use kernel::pagination::PaginationMeta;
use kernel::validate::is_valid_email;
use serde::{Deserialize, Serialize};

use crate::application::blog::{CreateBlogInput, UpdateBlogInput};
use crate::application::consultation::ConsultationSubmission;
use crate::application::waitlist::WaitlistSignup;
use crate::domain::entity::blog_post::{BlogPost, BlogStatus};
use crate::domain::entity::consultation_request::{ConsultationRequest, ConsultationStatus};
use crate::domain::entity::setting::Setting;
use crate::domain::entity::waitlist_entry::WaitlistEntry;

// ============================================================================
// Blog
// ============================================================================

/// Blog post as served to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostDto {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub author_image: Option<String>,
    pub read_time: Option<String>,
    pub status: BlogStatus,
    pub featured: bool,
    pub categories: Vec<String>,
    pub views: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BlogPost> for BlogPostDto {
    fn from(post: BlogPost) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            content: post.content,
            cover_image: post.cover_image,
            author: post.author,
            author_image: post.author_image,
            read_time: post.read_time,
            status: post.status,
            featured: post.featured,
            categories: post.categories,
            views: post.views,
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Public blog listing query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicBlogQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub featured: Option<bool>,
    pub category: Option<String>,
}

/// Admin blog listing query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminBlogQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub featured: Option<bool>,
}

/// Blog listing response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogListResponse {
    pub posts: Vec<BlogPostDto>,
    pub pagination: PaginationMeta,
}

/// Create blog post request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub author_image: Option<String>,
    pub read_time: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub categories: Vec<String>,
}

fn default_status() -> String {
    "draft".to_string()
}

impl CreateBlogRequest {
    /// Validate and convert to service input
    pub fn into_input(self) -> AppResult<CreateBlogInput> {
        let mut details = Vec::new();

        if self.title.trim().is_empty() {
            details.push(FieldError::new("title", "Title is required"));
        } else if self.title.chars().count() > 200 {
            details.push(FieldError::new("title", "Title must be at most 200 characters"));
        }
        if self.content.trim().is_empty() {
            details.push(FieldError::new("content", "Content is required"));
        }
        if let Some(excerpt) = &self.excerpt {
            if excerpt.chars().count() > 500 {
                details.push(FieldError::new(
                    "excerpt",
                    "Excerpt must be at most 500 characters",
                ));
            }
        }
        if self.author.trim().is_empty() {
            details.push(FieldError::new("author", "Author is required"));
        } else if self.author.chars().count() > 100 {
            details.push(FieldError::new(
                "author",
                "Author must be at most 100 characters",
            ));
        }

        let status = match BlogStatus::parse(&self.status) {
            Ok(status) => Some(status),
            Err(_) => {
                details.push(FieldError::new(
                    "status",
                    "Status must be 'draft' or 'published'",
                ));
                None
            }
        };

        if !details.is_empty() {
            return Err(AppError::validation(details));
        }

        Ok(CreateBlogInput {
            title: self.title.trim().to_string(),
            excerpt: self.excerpt,
            content: self.content,
            cover_image: self.cover_image,
            author: self.author.trim().to_string(),
            author_image: self.author_image,
            read_time: self.read_time,
            status: status.expect("validated above"),
            featured: self.featured,
            categories: self.categories,
        })
    }
}

/// Update blog post request; absent fields stay untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    pub author_image: Option<String>,
    pub read_time: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub categories: Option<Vec<String>>,
}

impl UpdateBlogRequest {
    /// Validate and convert to service input
    pub fn into_input(self) -> AppResult<UpdateBlogInput> {
        let mut details = Vec::new();

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                details.push(FieldError::new("title", "Title cannot be empty"));
            } else if title.chars().count() > 200 {
                details.push(FieldError::new("title", "Title must be at most 200 characters"));
            }
        }
        if let Some(content) = &self.content {
            if content.trim().is_empty() {
                details.push(FieldError::new("content", "Content cannot be empty"));
            }
        }
        if let Some(excerpt) = &self.excerpt {
            if excerpt.chars().count() > 500 {
                details.push(FieldError::new(
                    "excerpt",
                    "Excerpt must be at most 500 characters",
                ));
            }
        }

        let status = match &self.status {
            Some(raw) => match BlogStatus::parse(raw) {
                Ok(status) => Some(status),
                Err(_) => {
                    details.push(FieldError::new(
                        "status",
                        "Status must be 'draft' or 'published'",
                    ));
                    None
                }
            },
            None => None,
        };

        if !details.is_empty() {
            return Err(AppError::validation(details));
        }

        Ok(UpdateBlogInput {
            title: self.title.map(|t| t.trim().to_string()),
            excerpt: self.excerpt,
            content: self.content,
            cover_image: self.cover_image,
            author: self.author,
            author_image: self.author_image,
            read_time: self.read_time,
            status,
            featured: self.featured,
            categories: self.categories,
        })
    }
}

// ============================================================================
// Waitlist
// ============================================================================

/// Waitlist entry as served to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntryDto {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<WaitlistEntry> for WaitlistEntryDto {
    fn from(entry: WaitlistEntry) -> Self {
        Self {
            id: entry.id,
            email: entry.email,
            name: entry.name,
            notified: entry.notified,
            created_at: entry.created_at,
        }
    }
}

/// Public waitlist signup request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistSignupRequest {
    pub email: String,
    pub name: Option<String>,
}

impl WaitlistSignupRequest {
    pub fn into_input(self) -> AppResult<WaitlistSignup> {
        let email = self.email.trim().to_lowercase();

        let mut details = Vec::new();
        if email.is_empty() {
            details.push(FieldError::new("email", "Email is required"));
        } else if !is_valid_email(&email) {
            details.push(FieldError::new("email", "Invalid email format"));
        }

        if !details.is_empty() {
            return Err(AppError::validation(details));
        }

        Ok(WaitlistSignup {
            email,
            name: self
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        })
    }
}

/// Admin waitlist listing query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WaitlistQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub notified: Option<bool>,
}

/// Waitlist export query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WaitlistExportQuery {
    pub notified: Option<bool>,
}

/// Waitlist listing response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistListResponse {
    pub entries: Vec<WaitlistEntryDto>,
    pub pagination: PaginationMeta,
}

// ============================================================================
// Consultations
// ============================================================================

/// Consultation request as served to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationDto {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub project_details: String,
    pub status: ConsultationStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConsultationRequest> for ConsultationDto {
    fn from(request: ConsultationRequest) -> Self {
        Self {
            id: request.id,
            full_name: request.full_name,
            email: request.email,
            company: request.company,
            phone: request.phone,
            project_details: request.project_details,
            status: request.status,
            admin_notes: request.admin_notes,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// Public consultation submission request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationSubmitRequest {
    pub full_name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub project_details: String,
}

impl ConsultationSubmitRequest {
    pub fn into_input(self) -> AppResult<ConsultationSubmission> {
        let mut details = Vec::new();

        let full_name = self.full_name.trim();
        if full_name.chars().count() < 2 {
            details.push(FieldError::new(
                "fullName",
                "Full name must be at least 2 characters",
            ));
        }

        let email = self.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            details.push(FieldError::new("email", "Invalid email format"));
        }

        let company = self.company.trim();
        if company.chars().count() < 2 {
            details.push(FieldError::new(
                "company",
                "Company name must be at least 2 characters",
            ));
        }

        let phone = self.phone.trim();
        if phone.chars().count() < 10 {
            details.push(FieldError::new("phone", "Invalid phone number"));
        }

        let project_details = self.project_details.trim();
        if project_details.chars().count() < 10 {
            details.push(FieldError::new(
                "projectDetails",
                "Please provide more details about your project",
            ));
        }

        if !details.is_empty() {
            return Err(AppError::validation(details));
        }

        Ok(ConsultationSubmission {
            full_name: full_name.to_string(),
            email,
            company: company.to_string(),
            phone: phone.to_string(),
            project_details: project_details.to_string(),
        })
    }
}

/// Admin consultation listing query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsultationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

/// Consultation export query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsultationExportQuery {
    pub status: Option<String>,
}

/// Consultation listing response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationListResponse {
    pub consultations: Vec<ConsultationDto>,
    pub pagination: PaginationMeta,
}

/// Consultation status update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConsultationStatusRequest {
    pub status: String,
    pub admin_notes: Option<String>,
}

impl UpdateConsultationStatusRequest {
    pub fn parse_status(&self) -> AppResult<ConsultationStatus> {
        ConsultationStatus::parse(&self.status).map_err(|_| {
            AppError::validation(vec![FieldError::new(
                "status",
                "Status must be 'pending', 'contacted' or 'converted'",
            )])
        })
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Setting as served to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingDto {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl From<Setting> for SettingDto {
    fn from(setting: Setting) -> Self {
        Self {
            key: setting.key,
            value: setting.value,
            value_type: setting.value_type,
            description: setting.description,
            updated_at: setting.updated_at,
        }
    }
}

/// Upsert request for one setting
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSettingRequest {
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub description: Option<String>,
}

/// One entry of a bulk settings update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSettingEntry {
    pub key: String,
    pub value: String,
}

/// Bulk settings update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSettingsRequest {
    pub settings: Vec<BulkSettingEntry>,
}

impl BulkSettingsRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut details = Vec::new();

        if self.settings.is_empty() {
            details.push(FieldError::new("settings", "At least one setting is required"));
        }
        for (i, entry) in self.settings.iter().enumerate() {
            if entry.key.trim().is_empty() {
                details.push(FieldError::new(
                    format!("settings.{}.key", i),
                    "Key cannot be empty",
                ));
            }
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(details))
        }
    }
}
