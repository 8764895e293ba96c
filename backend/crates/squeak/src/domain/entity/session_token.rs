//! Session Token Claims
//!
//! Tokens are derived, never stored. A token carries its subject and expiry
//! and is only as good as its signature.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed claims carried by a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username the token was issued to
    pub sub: String,
    /// Expiry, Unix epoch milliseconds
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(subject: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: subject.into(),
            exp: expires_at.timestamp_millis(),
        }
    }

    /// Valid strictly before `exp`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.exp
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.exp).single()
    }
}

/// Why a token was refused
///
/// Logged for observability; callers only ever see "authentication required".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    Expired,
    Malformed,
    BadSignature,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::Expired => "expired",
            RejectionReason::Malformed => "malformed",
            RejectionReason::BadSignature => "bad_signature",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
