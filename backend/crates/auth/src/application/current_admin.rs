//! Current Admin Use Case
//!
//! Resolves a token subject back to a live administrator record,
//! applying the same redaction as login.

use std::sync::Arc;

use crate::domain::entity::admin::AdminProfile;
use crate::domain::repository::AdminRepository;
use crate::error::{AuthError, AuthResult};

/// Current admin use case
pub struct CurrentAdminUseCase<R>
where
    R: AdminRepository,
{
    repo: Arc<R>,
}

impl<R> CurrentAdminUseCase<R>
where
    R: AdminRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Look up an administrator by id
    ///
    /// A verified token whose subject no longer exists yields
    /// [`AuthError::AccountNotFound`]; callers treat it as an
    /// authentication failure, not a 404.
    pub async fn get(&self, id: i64) -> AuthResult<AdminProfile> {
        let admin = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        Ok(admin.redact())
    }
}
