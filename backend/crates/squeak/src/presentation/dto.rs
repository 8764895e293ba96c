//! API DTOs (Data Transfer Objects)

use axum::extract::FromRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{AccountFeed, Squeak};
use crate::error::SqueakError;

/// `Json` whose rejections become `SqueakError::Validation`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(SqueakError))]
pub struct JsonBody<T>(pub T);

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Register response
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response; the token itself only travels in the cookie
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Squeaks
// ============================================================================

/// Post squeak request
#[derive(Debug, Clone, Deserialize)]
pub struct PostSqueakRequest {
    pub text: String,
}

/// Post squeak response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSqueakResponse {
    pub squeak_count: u64,
}

/// One squeak in a feed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqueakResponse {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Squeak> for SqueakResponse {
    fn from(squeak: Squeak) -> Self {
        Self {
            text: squeak.text,
            created_at: squeak.created_at,
        }
    }
}

/// One account in the userbase listing (no email, no hash)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserbaseEntry {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub squeaks: Vec<SqueakResponse>,
}

impl From<AccountFeed> for UserbaseEntry {
    fn from(feed: AccountFeed) -> Self {
        Self {
            id: feed.account.id.get(),
            username: feed.account.username.into_inner(),
            created_at: feed.account.created_at,
            squeaks: feed.squeaks.into_iter().map(SqueakResponse::from).collect(),
        }
    }
}
