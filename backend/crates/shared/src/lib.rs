//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary every squeak crate agrees on:
//! - Error kinds, the unified [`error::app_error::AppError`] and its result alias
//! - Typed numeric identifiers handed out by the store
//!
//! Only things with a stable meaning across crates belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
