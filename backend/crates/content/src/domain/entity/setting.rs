//! Site Setting Entity

use chrono::{DateTime, Utc};

/// Key/value site setting
///
/// `value_type` is a display hint for the admin dashboard
/// (`string`, `number`, `boolean`, `email`, `url`); values are stored
/// and served as text either way.
#[derive(Debug, Clone)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub value_type: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        value_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            value_type: value_type.into(),
            description: description.into(),
            updated_at: Utc::now(),
        }
    }
}
