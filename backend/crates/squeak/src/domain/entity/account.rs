//! Account Entity
//!
//! A registered identity. Created once by registration and never updated.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, username::Username};

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    /// Store-assigned id, starting at 1
    pub id: AccountId,
    pub username: Username,
    pub email: Email,
    /// Argon2id PHC string; never the clear text
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
}

/// Everything a store needs to create an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: Username,
    pub email: Email,
    pub password_hash: HashedPassword,
}

impl NewAccount {
    /// Materialize with the id and timestamp the store assigned
    pub fn into_account(self, id: AccountId, created_at: DateTime<Utc>) -> Account {
        Account {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at,
        }
    }
}
