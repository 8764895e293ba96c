//! Infrastructure Layer
//!
//! Store backends.

pub mod memory;
pub mod postgres;

pub use memory::MemorySqueakStore;
pub use postgres::PgSqueakStore;
