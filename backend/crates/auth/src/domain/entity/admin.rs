//! Administrator Entity
//!
//! The single privileged actor. The password hash lives on the entity
//! but never leaves the auth crate: everything that crosses the
//! service boundary goes through [`Admin::redact`].

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use serde::Serialize;

use crate::domain::value_object::email::Email;

/// Administrator entity
#[derive(Debug, Clone)]
pub struct Admin {
    /// Database identifier
    pub id: i64,
    /// Login email (unique, case-normalized)
    pub email: Email,
    /// bcrypt hash; never serialized
    pub password_hash: HashedPassword,
    /// Optional display name
    pub display_name: Option<String>,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    /// Strip sensitive fields for anything leaving the auth boundary
    pub fn redact(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            email: self.email.as_str().to_string(),
            display_name: self.display_name.clone(),
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Redacted administrator profile
///
/// The only admin shape handlers and responses ever see. By
/// construction it cannot carry the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Admin {
        let now = Utc::now();
        Admin {
            id: 1,
            email: Email::new("admin@example.com").unwrap(),
            password_hash: HashedPassword::from_hash_string(
                // Shape-valid bcrypt string; never verified in this test
                format!("$2b$04${}", "a".repeat(53)),
            )
            .unwrap(),
            display_name: Some("Admin".to_string()),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_redact_keeps_public_fields() {
        let profile = admin().redact();
        assert_eq!(profile.id, 1);
        assert_eq!(profile.email, "admin@example.com");
        assert_eq!(profile.display_name.as_deref(), Some("Admin"));
    }

    #[test]
    fn test_redacted_profile_never_serializes_hash() {
        let json = serde_json::to_string(&admin().redact()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$"));
        assert!(json.contains("\"email\":\"admin@example.com\""));
    }
}
