//! Authorize Use Case
//!
//! The posting gate: a token may only act on its own subject's feed.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::entity::Account;
use crate::domain::repository::SqueakStore;
use crate::domain::value_object::username::Username;
use crate::error::{SqueakError, SqueakResult};

/// Authorize use case
pub struct AuthorizeUseCase<S>
where
    S: SqueakStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> AuthorizeUseCase<S>
where
    S: SqueakStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    /// Resolve `token` to the account allowed to act on `target`
    ///
    /// Any failure is terminal for the request.
    pub async fn execute(&self, token: Option<&str>, target: &str) -> SqueakResult<Account> {
        let token = token.ok_or(SqueakError::MissingToken)?;
        let claims = TokenService::new(self.config.clone()).validate(token)?;

        let subject = Username::new(&claims.sub)
            .map_err(|_| SqueakError::UnknownSubject(claims.sub.clone()))?;
        let account = self
            .store
            .find_by_username(&subject)
            .await?
            .ok_or_else(|| SqueakError::UnknownSubject(claims.sub.clone()))?;

        // Same normalisation as the feed read, so both resolve one account
        let owns_target = Username::new(target).is_ok_and(|target| target == account.username);
        if !owns_target {
            return Err(SqueakError::Forbidden {
                subject: claims.sub,
                target: target.to_string(),
            });
        }

        Ok(account)
    }
}
