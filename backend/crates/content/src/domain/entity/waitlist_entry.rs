//! Waitlist Entry Entity

use chrono::{DateTime, Utc};

/// Waitlist entry
///
/// The email is unique at the storage layer; a second signup with the
/// same address surfaces as a duplicate-entry conflict.
#[derive(Debug, Clone)]
pub struct WaitlistEntry {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
}
