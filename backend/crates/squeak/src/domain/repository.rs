//! Store Trait
//!
//! The persistence capability every backend implements. Backends are chosen
//! at startup; nothing above this layer knows which one is in use.

use kernel::id::AccountId;
use std::fmt;

use crate::domain::entity::{Account, AccountFeed, NewAccount, Squeak};
use crate::domain::value_object::{email::Email, username::Username};
use crate::error::SqueakResult;

/// Which unique fields collided on registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateFields {
    pub username: bool,
    pub email: bool,
}

impl DuplicateFields {
    pub fn any(&self) -> bool {
        self.username || self.email
    }

    /// Field names in a stable order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(2);
        if self.username {
            names.push("username");
        }
        if self.email {
            names.push("email");
        }
        names
    }

    /// Fields flagged in either set
    pub fn union(self, other: Self) -> Self {
        Self {
            username: self.username || other.username,
            email: self.email || other.email,
        }
    }
}

impl fmt::Display for DuplicateFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}

/// Account and squeak store
///
/// Expected outcomes are typed: a duplicate is `SqueakError::Duplicate`, an
/// unknown author is `SqueakError::AccountNotFound`, a missing lookup is
/// `Ok(None)`. Only backend failures surface as `SqueakError::Database`.
#[trait_variant::make(SqueakStore: Send)]
pub trait LocalSqueakStore {
    /// Create an account and return its id
    ///
    /// Uniqueness of username and email is checked atomically with the
    /// insert. On conflict nothing is written and the error lists every
    /// colliding field.
    async fn create_account(&self, account: NewAccount) -> SqueakResult<AccountId>;

    /// Report which of `username` / `email` are already taken
    async fn find_conflicts(
        &self,
        username: &Username,
        email: &Email,
    ) -> SqueakResult<DuplicateFields>;

    /// Find account by username
    async fn find_by_username(&self, username: &Username) -> SqueakResult<Option<Account>>;

    /// Find account by id
    async fn find_by_id(&self, id: AccountId) -> SqueakResult<Option<Account>>;

    /// Append a squeak to the author's sequence and return the new count
    async fn append_squeak(&self, author: &Username, text: &str) -> SqueakResult<u64>;

    /// Squeaks of one account, oldest first
    async fn list_squeaks(&self, author: &Username) -> SqueakResult<Vec<Squeak>>;

    /// Every account in creation order, each with its squeaks oldest first
    async fn list_accounts_with_squeaks(&self) -> SqueakResult<Vec<AccountFeed>>;
}
