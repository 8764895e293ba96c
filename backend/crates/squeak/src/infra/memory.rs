//! In-Memory Store
//!
//! Process-local backend. One `RwLock` guards the whole state, so writers
//! are serialized: ids are never handed out twice and uniqueness checks
//! happen under the same lock as the insert.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use kernel::id::{AccountId, SqueakId};
use tokio::sync::RwLock;

use crate::domain::entity::{Account, AccountFeed, NewAccount, Squeak};
use crate::domain::repository::{DuplicateFields, SqueakStore};
use crate::domain::value_object::{email::Email, username::Username};
use crate::error::{SqueakError, SqueakResult};

#[derive(Debug, Default)]
struct MemoryState {
    /// Creation order; index = id - 1
    accounts: Vec<AccountRecord>,
    by_username: HashMap<Username, usize>,
    by_email: HashMap<Email, usize>,
    last_squeak_id: i64,
}

#[derive(Debug)]
struct AccountRecord {
    account: Account,
    squeaks: Vec<Squeak>,
}

impl MemoryState {
    fn conflicts(&self, username: &Username, email: &Email) -> DuplicateFields {
        DuplicateFields {
            username: self.by_username.contains_key(username),
            email: self.by_email.contains_key(email),
        }
    }

    fn record(&self, username: &Username) -> Option<&AccountRecord> {
        self.by_username
            .get(username)
            .and_then(|&idx| self.accounts.get(idx))
    }
}

/// In-memory store; clones share the same state
#[derive(Debug, Clone, Default)]
pub struct MemorySqueakStore {
    inner: Arc<RwLock<MemoryState>>,
}

impl MemorySqueakStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SqueakStore for MemorySqueakStore {
    async fn create_account(&self, account: NewAccount) -> SqueakResult<AccountId> {
        let mut state = self.inner.write().await;

        let conflicts = state.conflicts(&account.username, &account.email);
        if conflicts.any() {
            return Err(SqueakError::Duplicate(conflicts));
        }

        let idx = state.accounts.len();
        let id = AccountId::new(idx as i64 + 1);
        let account = account.into_account(id, Utc::now());

        state.by_username.insert(account.username.clone(), idx);
        state.by_email.insert(account.email.clone(), idx);
        state.accounts.push(AccountRecord {
            account,
            squeaks: Vec::new(),
        });

        Ok(id)
    }

    async fn find_conflicts(
        &self,
        username: &Username,
        email: &Email,
    ) -> SqueakResult<DuplicateFields> {
        Ok(self.inner.read().await.conflicts(username, email))
    }

    async fn find_by_username(&self, username: &Username) -> SqueakResult<Option<Account>> {
        let state = self.inner.read().await;
        Ok(state.record(username).map(|r| r.account.clone()))
    }

    async fn find_by_id(&self, id: AccountId) -> SqueakResult<Option<Account>> {
        let state = self.inner.read().await;
        let account = id
            .get()
            .checked_sub(1)
            .and_then(|idx| usize::try_from(idx).ok())
            .and_then(|idx| state.accounts.get(idx))
            .map(|r| r.account.clone());
        Ok(account)
    }

    async fn append_squeak(&self, author: &Username, text: &str) -> SqueakResult<u64> {
        let mut state = self.inner.write().await;

        let idx = *state
            .by_username
            .get(author)
            .ok_or(SqueakError::AccountNotFound)?;

        state.last_squeak_id += 1;
        let squeak = Squeak {
            id: SqueakId::new(state.last_squeak_id),
            text: text.to_string(),
            created_at: Utc::now(),
        };

        let record = state
            .accounts
            .get_mut(idx)
            .ok_or_else(|| SqueakError::Internal("username index out of sync".to_string()))?;
        record.squeaks.push(squeak);

        Ok(record.squeaks.len() as u64)
    }

    async fn list_squeaks(&self, author: &Username) -> SqueakResult<Vec<Squeak>> {
        let state = self.inner.read().await;
        state
            .record(author)
            .map(|r| r.squeaks.clone())
            .ok_or(SqueakError::AccountNotFound)
    }

    async fn list_accounts_with_squeaks(&self) -> SqueakResult<Vec<AccountFeed>> {
        let state = self.inner.read().await;
        Ok(state
            .accounts
            .iter()
            .map(|r| AccountFeed {
                account: r.account.clone(),
                squeaks: r.squeaks.clone(),
            })
            .collect())
    }
}
