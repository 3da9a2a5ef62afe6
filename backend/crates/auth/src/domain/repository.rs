//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::admin::Admin;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Administrator repository trait
///
/// Absence is a value, not an error: lookups return `Option` and the
/// use cases decide what a miss means.
#[trait_variant::make(AdminRepository: Send)]
pub trait LocalAdminRepository {
    /// Create a new administrator, returning the assigned id
    async fn create(&self, admin: &Admin) -> AuthResult<i64>;

    /// Find administrator by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Admin>>;

    /// Find administrator by id
    async fn find_by_id(&self, id: i64) -> AuthResult<Option<Admin>>;

    /// Record a successful login
    async fn update_last_login(&self, id: i64, at: DateTime<Utc>) -> AuthResult<()>;
}
