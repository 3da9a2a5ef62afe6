//! Consultation Service

use std::sync::Arc;

use chrono::Utc;
use kernel::error::app_error::{AppError, AppResult};
use kernel::pagination::Page;

use crate::application::export::csv_field;
use crate::domain::entity::consultation_request::{ConsultationRequest, ConsultationStatus};
use crate::domain::repository::{ConsultationRepository, ConsultationStats};

/// Public submission input (already validated at the DTO boundary)
#[derive(Debug)]
pub struct ConsultationSubmission {
    pub full_name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub project_details: String,
}

/// Consultation service
pub struct ConsultationService<R>
where
    R: ConsultationRepository,
{
    repo: Arc<R>,
}

impl<R> ConsultationService<R>
where
    R: ConsultationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn submit(&self, input: ConsultationSubmission) -> AppResult<ConsultationRequest> {
        let now = Utc::now();
        let mut request = ConsultationRequest {
            id: 0,
            full_name: input.full_name,
            email: input.email.trim().to_lowercase(),
            company: input.company,
            phone: input.phone,
            project_details: input.project_details,
            status: ConsultationStatus::Pending,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        };

        request.id = self.repo.create(&request).await?;

        tracing::info!(request_id = request.id, "Consultation request submitted");

        Ok(request)
    }

    pub async fn list(
        &self,
        page: Page,
        status: Option<ConsultationStatus>,
    ) -> AppResult<(Vec<ConsultationRequest>, u64)> {
        self.repo.list(page, status).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<ConsultationRequest> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Consultation request not found"))
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: ConsultationStatus,
        admin_notes: Option<String>,
    ) -> AppResult<ConsultationRequest> {
        self.repo
            .update_status(id, status, admin_notes)
            .await?
            .ok_or_else(|| AppError::not_found("Consultation request not found"))
    }

    pub async fn stats(&self) -> AppResult<ConsultationStats> {
        self.repo.stats().await
    }

    /// Render matching requests as CSV
    pub async fn export_csv(&self, status: Option<ConsultationStatus>) -> AppResult<String> {
        let requests = self.repo.list_all(status).await?;

        let mut csv = String::from("id,fullName,email,company,phone,status,date\n");
        for request in requests {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                request.id,
                csv_field(&request.full_name),
                csv_field(&request.email),
                csv_field(&request.company),
                csv_field(&request.phone),
                request.status.as_str(),
                csv_field(&request.created_at.to_rfc3339()),
            ));
        }

        Ok(csv)
    }
}
