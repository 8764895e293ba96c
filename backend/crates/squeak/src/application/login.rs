//! Login Use Case
//!
//! Verifies credentials and issues a bearer token.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::password::{ClearTextPassword, burn_verification};

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::repository::SqueakStore;
use crate::domain::value_object::username::Username;
use crate::error::{SqueakError, SqueakResult};

/// Login input
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Login output
pub struct LoginOutput {
    pub username: String,
    /// Bearer token for the cookie
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Login use case
pub struct LoginUseCase<S>
where
    S: SqueakStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> LoginUseCase<S>
where
    S: SqueakStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: LoginInput) -> SqueakResult<LoginOutput> {
        // The policy of today may not be the policy the password was set under
        let password = ClearTextPassword::without_policy(input.password);
        let pepper = self.config.pepper();

        let account = match Username::new(&input.username) {
            Ok(username) => self.store.find_by_username(&username).await?,
            Err(_) => None,
        };

        let Some(account) = account else {
            // Same cost as a wrong password, same answer
            burn_verification(&password, pepper);
            return Err(SqueakError::InvalidCredentials);
        };

        if !account.password_hash.verify(&password, pepper)? {
            return Err(SqueakError::InvalidCredentials);
        }

        let issued = TokenService::new(self.config.clone()).issue(account.username.as_str())?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            "Account logged in"
        );

        Ok(LoginOutput {
            username: account.username.into_inner(),
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }
}
