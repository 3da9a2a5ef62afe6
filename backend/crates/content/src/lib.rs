//! Content Backend Module
//!
//! Blog, waitlist, consultation and site-settings capabilities behind
//! the public site and the admin dashboard.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, status enums, repository traits
//! - `application/` - Services (slug + publish rules, CSV export, stats)
//! - `infra/` - PostgreSQL implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! Failures here are exactly the kernel kinds (not-found, duplicate,
//! validation), so this crate uses `kernel::error::AppError` directly
//! instead of defining its own error enum.

pub mod application;
pub mod domain;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use infra::postgres::PgContentRepository;
pub use presentation::handlers::ContentAppState;
pub use presentation::router::{admin_router, public_router};

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
