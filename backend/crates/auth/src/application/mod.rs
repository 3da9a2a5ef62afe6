//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_admin;
pub mod login;
pub mod token;

// Re-exports
pub use config::AuthConfig;
pub use current_admin::CurrentAdminUseCase;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use token::{Claims, TokenError, TokenService};
