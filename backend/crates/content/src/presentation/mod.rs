//! Presentation Layer
//!
//! HTTP handlers, DTOs, and routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{ContentAppState, ContentStore};
pub use router::{admin_router, public_router};
