//! Feed Use Case
//!
//! Read-only listings; no authentication involved.

use std::sync::Arc;

use crate::domain::entity::{AccountFeed, Squeak};
use crate::domain::repository::SqueakStore;
use crate::domain::value_object::username::Username;
use crate::error::{SqueakError, SqueakResult};

/// Feed use case
pub struct FeedUseCase<S>
where
    S: SqueakStore,
{
    store: Arc<S>,
}

impl<S> FeedUseCase<S>
where
    S: SqueakStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// One account's squeaks, oldest first
    ///
    /// Empty for an account that never posted; `AccountNotFound` for an
    /// unknown username.
    pub async fn squeaks_of(&self, username: &str) -> SqueakResult<Vec<Squeak>> {
        // A name that fails validation can't belong to anyone
        let username = Username::new(username).map_err(|_| SqueakError::AccountNotFound)?;
        self.store.list_squeaks(&username).await
    }

    /// Every account with its squeaks, in registration order
    pub async fn userbase(&self) -> SqueakResult<Vec<AccountFeed>> {
        self.store.list_accounts_with_squeaks().await
    }
}
