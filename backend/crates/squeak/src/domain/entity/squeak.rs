//! Squeak Entity
//!
//! A short text post owned by exactly one account. Squeaks are append-only:
//! an account's squeaks are always read back in the order they were written.

use chrono::{DateTime, Utc};
use kernel::id::SqueakId;

use crate::domain::entity::account::Account;

/// Squeak entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squeak {
    pub id: SqueakId,
    /// Free text; not validated, may be empty
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// An account together with its squeaks, oldest first
#[derive(Debug, Clone)]
pub struct AccountFeed {
    pub account: Account,
    pub squeaks: Vec<Squeak>,
}
