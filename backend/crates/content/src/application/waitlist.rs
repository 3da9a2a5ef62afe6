//! Waitlist Service

use std::sync::Arc;

use chrono::Utc;
use kernel::error::app_error::{AppError, AppResult};
use kernel::pagination::Page;

use crate::application::export::csv_field;
use crate::domain::entity::waitlist_entry::WaitlistEntry;
use crate::domain::repository::{WaitlistRepository, WaitlistStats};

/// Public signup input (already validated at the DTO boundary)
pub struct WaitlistSignup {
    pub email: String,
    pub name: Option<String>,
}

/// Waitlist service
pub struct WaitlistService<R>
where
    R: WaitlistRepository,
{
    repo: Arc<R>,
}

impl<R> WaitlistService<R>
where
    R: WaitlistRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Public signup; a duplicate email bubbles up as a 409 conflict
    /// from the storage layer's unique index.
    pub async fn signup(&self, input: WaitlistSignup) -> AppResult<WaitlistEntry> {
        let mut entry = WaitlistEntry {
            id: 0,
            email: input.email.trim().to_lowercase(),
            name: input.name,
            notified: false,
            created_at: Utc::now(),
        };

        entry.id = self.repo.create(&entry).await?;

        tracing::info!(entry_id = entry.id, "Waitlist signup");

        Ok(entry)
    }

    pub async fn list(
        &self,
        page: Page,
        notified: Option<bool>,
    ) -> AppResult<(Vec<WaitlistEntry>, u64)> {
        self.repo.list(page, notified).await
    }

    pub async fn mark_notified(&self, id: i64) -> AppResult<WaitlistEntry> {
        self.repo
            .mark_notified(id)
            .await?
            .ok_or_else(|| AppError::not_found("Waitlist entry not found"))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Waitlist entry not found"));
        }
        Ok(())
    }

    pub async fn stats(&self) -> AppResult<WaitlistStats> {
        self.repo.stats().await
    }

    /// Render matching entries as CSV
    pub async fn export_csv(&self, notified: Option<bool>) -> AppResult<String> {
        let entries = self.repo.list_all(notified).await?;

        let mut csv = String::from("id,name,email,notified,date\n");
        for entry in entries {
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                entry.id,
                csv_field(entry.name.as_deref().unwrap_or("")),
                csv_field(&entry.email),
                entry.notified,
                csv_field(&entry.created_at.to_rfc3339()),
            ));
        }

        Ok(csv)
    }
}
