//! Squeak Router

use axum::{
    Router,
    handler::Handler,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::SqueakStore;
use crate::presentation::handlers::{self, SqueakAppState};
use crate::presentation::middleware::require_author;

/// Create the squeak router for any store implementation
pub fn squeak_router<S>(store: S, config: AuthConfig) -> Router
where
    S: SqueakStore + Clone + Send + Sync + 'static,
{
    let state = SqueakAppState {
        store: Arc::new(store),
        config: Arc::new(config),
    };

    let gated_post = handlers::post_squeak::<S>
        .layer(middleware::from_fn_with_state(state.clone(), require_author::<S>));

    Router::new()
        .route("/register", post(handlers::register::<S>))
        .route("/login", post(handlers::login::<S>))
        .route("/logout", post(handlers::logout::<S>))
        .route(
            "/users/{username}",
            get(handlers::list_squeaks::<S>).post(gated_post),
        )
        .route("/userbase", get(handlers::userbase::<S>))
        .with_state(state)
}
