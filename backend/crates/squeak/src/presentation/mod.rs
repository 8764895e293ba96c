//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::SqueakAppState;
pub use middleware::{AuthenticatedAuthor, require_author};
pub use router::squeak_router;
