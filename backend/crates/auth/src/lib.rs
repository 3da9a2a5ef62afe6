//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Single-admin login with email + password
//! - Stateless bearer tokens (signed JWT, time-limited)
//! - Authorization middleware with a request-scoped admin context
//!
//! ## Security Model
//! - Passwords hashed with bcrypt (tunable cost)
//! - Lookup misses still pay a full hash verification (anti-enumeration)
//! - Uniform "Invalid email or password" on any credential failure
//! - Expired and malformed tokens are distinct error kinds

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::{AuthConfig, AuthConfigError};
pub use application::token::{Claims, TokenService};
pub use domain::{Admin, AdminProfile, Email};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAdminRepository;
pub use presentation::handlers::AuthAppState;
pub use presentation::middleware::{AuthContext, MaybeAuth};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
