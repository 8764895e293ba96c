//! Register Use Case
//!
//! Creates a new account.

use std::sync::Arc;

use kernel::id::AccountId;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::NewAccount;
use crate::domain::repository::SqueakStore;
use crate::domain::value_object::{email::Email, username::Username};
use crate::error::{SqueakError, SqueakResult};

/// Register input
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Register output
pub struct RegisterOutput {
    pub account_id: AccountId,
}

/// Register use case
pub struct RegisterUseCase<S>
where
    S: SqueakStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> RegisterUseCase<S>
where
    S: SqueakStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> SqueakResult<RegisterOutput> {
        let username =
            Username::new(&input.username).map_err(|e| SqueakError::Validation(e.to_string()))?;
        let email = Email::new(&input.email).map_err(|e| SqueakError::Validation(e.to_string()))?;
        let password = ClearTextPassword::new(input.password, &self.config.password_policy)?;

        // Cheap pre-check so duplicates don't pay for hashing;
        // create_account still enforces uniqueness atomically
        let conflicts = self.store.find_conflicts(&username, &email).await?;
        if conflicts.any() {
            return Err(SqueakError::Duplicate(conflicts));
        }

        let password_hash = password.hash(self.config.pepper())?;

        let account_id = self
            .store
            .create_account(NewAccount {
                username: username.clone(),
                email,
                password_hash,
            })
            .await?;

        tracing::info!(
            account_id = %account_id,
            username = %username,
            "Account registered"
        );

        Ok(RegisterOutput { account_id })
    }
}
