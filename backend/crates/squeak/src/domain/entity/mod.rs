//! Entities

pub mod account;
pub mod session_token;
pub mod squeak;

pub use account::{Account, NewAccount};
pub use session_token::{RejectionReason, SessionClaims};
pub use squeak::{AccountFeed, Squeak};
