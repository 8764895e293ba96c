//! Domain Layer
//!
//! Contains entities, value objects, and the store capability trait.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{Account, AccountFeed, NewAccount, Squeak};
pub use repository::{DuplicateFields, SqueakStore};
