//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    FeedUseCase, LoginInput, LoginUseCase, PostSqueakUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::repository::SqueakStore;
use crate::error::SqueakResult;
use crate::presentation::dto::{
    JsonBody, LoginRequest, LoginResponse, PostSqueakRequest, PostSqueakResponse,
    RegisterRequest, RegisterResponse, SqueakResponse, UserbaseEntry,
};
use crate::presentation::middleware::AuthenticatedAuthor;

/// Shared state for squeak handlers
#[derive(Clone)]
pub struct SqueakAppState<S>
where
    S: SqueakStore + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<S>(
    State(state): State<SqueakAppState<S>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> SqueakResult<impl IntoResponse>
where
    S: SqueakStore + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.store.clone(), state.config.clone());

    let input = RegisterInput {
        username: req.username,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: output.account_id.get(),
        }),
    ))
}

// ============================================================================
// Login / Logout
// ============================================================================

/// POST /login
pub async fn login<S>(
    State(state): State<SqueakAppState<S>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> SqueakResult<impl IntoResponse>
where
    S: SqueakStore + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.store.clone(), state.config.clone());

    let input = LoginInput {
        username: req.username,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    // Max-Age matches the token TTL
    let cookie = state.config.token_cookie().build_set_cookie(&output.token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            username: output.username,
            expires_at: output.expires_at,
        }),
    ))
}

/// POST /logout
///
/// Tokens are stateless; this only tells the client to drop the cookie.
pub async fn logout<S>(State(state): State<SqueakAppState<S>>) -> impl IntoResponse
where
    S: SqueakStore + Clone + Send + Sync + 'static,
{
    let cookie = state.config.token_cookie().build_delete_cookie();

    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

// ============================================================================
// Squeaks
// ============================================================================

/// POST /users/{username} (behind the author gate)
pub async fn post_squeak<S>(
    State(state): State<SqueakAppState<S>>,
    Extension(AuthenticatedAuthor(author)): Extension<AuthenticatedAuthor>,
    JsonBody(req): JsonBody<PostSqueakRequest>,
) -> SqueakResult<impl IntoResponse>
where
    S: SqueakStore + Clone + Send + Sync + 'static,
{
    let use_case = PostSqueakUseCase::new(state.store.clone());

    let squeak_count = use_case.execute(&author, &req.text).await?;

    Ok((StatusCode::ACCEPTED, Json(PostSqueakResponse { squeak_count })))
}

/// GET /users/{username}
pub async fn list_squeaks<S>(
    State(state): State<SqueakAppState<S>>,
    Path(username): Path<String>,
) -> SqueakResult<Json<Vec<SqueakResponse>>>
where
    S: SqueakStore + Clone + Send + Sync + 'static,
{
    let squeaks = FeedUseCase::new(state.store.clone())
        .squeaks_of(&username)
        .await?;

    Ok(Json(squeaks.into_iter().map(SqueakResponse::from).collect()))
}

/// GET /userbase
pub async fn userbase<S>(
    State(state): State<SqueakAppState<S>>,
) -> SqueakResult<Json<Vec<UserbaseEntry>>>
where
    S: SqueakStore + Clone + Send + Sync + 'static,
{
    let feeds = FeedUseCase::new(state.store.clone()).userbase().await?;

    Ok(Json(feeds.into_iter().map(UserbaseEntry::from).collect()))
}
