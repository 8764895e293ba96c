//! Squeak Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, the store capability trait
//! - `application/` - Use cases (register, login, tokens, authorization, feeds)
//! - `infra/` - Store backends (in-memory, PostgreSQL)
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Registration with unique username and email
//! - Login issuing a stateless HMAC-signed bearer token in an `Authorization` cookie
//! - Posting squeaks, gated on the token's subject owning the target path
//! - Per-user feed and the aggregate userbase listing
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional application-wide pepper
//! - Login failures look the same whether the user exists or not
//! - Token rejection reasons are logged, never returned

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::repository::SqueakStore;
pub use error::{SqueakError, SqueakResult};
pub use infra::memory::MemorySqueakStore;
pub use infra::postgres::PgSqueakStore;
pub use presentation::router::squeak_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
