//! Author Gate Middleware
//!
//! Wraps posting routes: the bearer token must resolve to the account the
//! path names. The resolved account is handed to the handler as an extension.

use axum::extract::{Path, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use platform::cookie::{extract_bearer, extract_cookie};

use crate::application::AuthorizeUseCase;
use crate::domain::entity::Account;
use crate::domain::repository::SqueakStore;
use crate::error::SqueakResult;
use crate::presentation::handlers::SqueakAppState;

/// Account that passed the gate, stored in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedAuthor(pub Account);

/// Middleware that requires the token's subject to own `{username}`
///
/// Token carrier: the auth cookie, falling back to `Authorization: Bearer`.
pub async fn require_author<S>(
    State(state): State<SqueakAppState<S>>,
    Path(username): Path<String>,
    mut req: Request,
    next: Next,
) -> SqueakResult<Response>
where
    S: SqueakStore + Clone + Send + Sync + 'static,
{
    let headers = req.headers();
    let token = extract_cookie(headers, &state.config.cookie_name).or_else(|| extract_bearer(headers));

    let account = AuthorizeUseCase::new(state.store.clone(), state.config.clone())
        .execute(token.as_deref(), &username)
        .await?;

    req.extensions_mut().insert(AuthenticatedAuthor(account));

    Ok(next.run(req).await)
}
