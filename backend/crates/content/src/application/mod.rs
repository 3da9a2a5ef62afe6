//! Application Layer
//!
//! Services carrying the business rules around the repositories.

pub mod blog;
pub mod consultation;
pub mod export;
pub mod settings;
pub mod waitlist;

// Re-exports
pub use blog::{BlogService, CreateBlogInput, UpdateBlogInput};
pub use consultation::{ConsultationService, ConsultationSubmission};
pub use settings::SettingsService;
pub use waitlist::{WaitlistService, WaitlistSignup};
