//! Settings Service
//!
//! Key/value site configuration with idempotent defaults.

use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult};

use crate::domain::entity::setting::Setting;
use crate::domain::repository::SettingsRepository;

/// Defaults created at startup when absent
const DEFAULT_SETTINGS: &[(&str, &str, &str, &str)] = &[
    (
        "site_name",
        "Atlas Africa",
        "string",
        "Website name displayed in header and emails",
    ),
    (
        "site_description",
        "Creative Marketing Agency",
        "string",
        "Site tagline or description",
    ),
    (
        "contact_email",
        "hello@atlasafrica.org",
        "email",
        "Main contact email address",
    ),
    (
        "notifications_enabled",
        "true",
        "boolean",
        "Enable email notifications for new submissions",
    ),
    (
        "maintenance_mode",
        "false",
        "boolean",
        "Put site in maintenance mode",
    ),
    (
        "posts_per_page",
        "10",
        "number",
        "Number of blog posts per page",
    ),
    (
        "allow_comments",
        "false",
        "boolean",
        "Enable blog post comments",
    ),
    (
        "google_analytics_id",
        "",
        "string",
        "Google Analytics tracking ID",
    ),
    ("facebook_url", "", "url", "Facebook page URL"),
    ("twitter_url", "", "url", "Twitter/X profile URL"),
    ("instagram_url", "", "url", "Instagram profile URL"),
    ("linkedin_url", "", "url", "LinkedIn company page URL"),
];

/// Settings service
pub struct SettingsService<R>
where
    R: SettingsRepository,
{
    repo: Arc<R>,
}

impl<R> SettingsService<R>
where
    R: SettingsRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn all(&self) -> AppResult<Vec<Setting>> {
        self.repo.list_all().await
    }

    pub async fn get(&self, key: &str) -> AppResult<Setting> {
        self.repo
            .find(key)
            .await?
            .ok_or_else(|| AppError::not_found("Setting not found"))
    }

    /// Create or update one setting
    ///
    /// On update, an omitted type or description keeps the stored one.
    pub async fn upsert(
        &self,
        key: &str,
        value: String,
        value_type: Option<String>,
        description: Option<String>,
    ) -> AppResult<Setting> {
        let existing = self.repo.find(key).await?;

        let setting = Setting::new(
            key,
            value,
            value_type
                .or_else(|| existing.as_ref().map(|s| s.value_type.clone()))
                .unwrap_or_else(|| "string".to_string()),
            description
                .or_else(|| existing.as_ref().map(|s| s.description.clone()))
                .unwrap_or_default(),
        );

        self.repo.upsert(&setting).await?;

        Ok(setting)
    }

    /// Update several settings in one call
    pub async fn upsert_many(&self, entries: Vec<(String, String)>) -> AppResult<()> {
        for (key, value) in entries {
            self.upsert(&key, value, None, None).await?;
        }
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> AppResult<()> {
        if !self.repo.delete(key).await? {
            return Err(AppError::not_found("Setting not found"));
        }
        Ok(())
    }

    /// Create the default settings that do not exist yet
    ///
    /// Idempotent; existing values are never overwritten.
    pub async fn initialize_defaults(&self) -> AppResult<u32> {
        let mut created = 0;

        for (key, value, value_type, description) in DEFAULT_SETTINGS {
            if self.repo.find(key).await?.is_none() {
                let setting = Setting::new(*key, *value, *value_type, *description);
                self.repo.upsert(&setting).await?;
                created += 1;
            }
        }

        if created > 0 {
            tracing::info!(created = created, "Initialized default settings");
        }

        Ok(created)
    }
}
