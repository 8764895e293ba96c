//! Post Squeak Use Case

use std::sync::Arc;

use crate::domain::entity::Account;
use crate::domain::repository::SqueakStore;
use crate::error::SqueakResult;

/// Post squeak use case
pub struct PostSqueakUseCase<S>
where
    S: SqueakStore,
{
    store: Arc<S>,
}

impl<S> PostSqueakUseCase<S>
where
    S: SqueakStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Append `text` to the author's squeaks; returns the new squeak count
    ///
    /// `author` has already passed the posting gate.
    pub async fn execute(&self, author: &Account, text: &str) -> SqueakResult<u64> {
        let count = self.store.append_squeak(&author.username, text).await?;

        tracing::info!(
            account_id = %author.id,
            username = %author.username,
            squeak_count = count,
            "Squeak posted"
        );

        Ok(count)
    }
}
