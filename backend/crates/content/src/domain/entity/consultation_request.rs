//! Consultation Request Entity

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Follow-up state of a consultation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    Pending,
    Contacted,
    Converted,
}

impl ConsultationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConsultationStatus::Pending => "pending",
            ConsultationStatus::Contacted => "contacted",
            ConsultationStatus::Converted => "converted",
        }
    }

    /// Parse a status, case-insensitively
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ConsultationStatus::Pending),
            "contacted" => Ok(ConsultationStatus::Contacted),
            "converted" => Ok(ConsultationStatus::Converted),
            _ => Err(AppError::bad_request(format!(
                "Unknown consultation status: {}",
                s
            ))),
        }
    }
}

/// Consultation request entity
#[derive(Debug, Clone)]
pub struct ConsultationRequest {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(
            ConsultationStatus::parse("pending").unwrap(),
            ConsultationStatus::Pending
        );
        assert_eq!(
            ConsultationStatus::parse("CONTACTED").unwrap(),
            ConsultationStatus::Contacted
        );
        assert!(ConsultationStatus::parse("closed").is_err());
    }
}
