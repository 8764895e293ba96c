//! Token Issuer / Validator
//!
//! Stateless bearer tokens: `base64url(claims JSON) "." base64url(HMAC-SHA256)`.
//! The MAC covers the encoded claims, so subject and expiry are both
//! tamper-evident. Nothing is stored server-side.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};

use crate::application::config::AuthConfig;
use crate::domain::entity::session_token::{RejectionReason, SessionClaims};
use crate::error::{SqueakError, SqueakResult};

/// A freshly minted token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Token service
pub struct TokenService {
    config: Arc<AuthConfig>,
}

impl TokenService {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Issue a token for `subject`, valid for the configured TTL
    pub fn issue(&self, subject: &str) -> SqueakResult<IssuedToken> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> SqueakResult<IssuedToken> {
        let expires_at = self
            .config
            .token_ttl_ms()
            .and_then(Duration::try_milliseconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| SqueakError::Internal("token expiry out of range".to_string()))?;
        let claims = SessionClaims::new(subject, expires_at);

        let json = serde_json::to_vec(&claims).map_err(|e| SqueakError::Internal(e.to_string()))?;
        let payload = to_base64url(&json);
        let signature = hmac_sha256(&self.config.token_secret, payload.as_bytes())?;

        Ok(IssuedToken {
            token: format!("{}.{}", payload, to_base64url(&signature)),
            expires_at,
        })
    }

    /// Validate a token and return its claims
    ///
    /// Every failure is `SqueakError::TokenRejected`, carrying the reason.
    pub fn validate(&self, token: &str) -> SqueakResult<SessionClaims> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> SqueakResult<SessionClaims> {
        let reject = |reason| SqueakError::TokenRejected(reason);

        let (payload, signature) = token
            .split_once('.')
            .ok_or(reject(RejectionReason::Malformed))?;
        let signature = from_base64url(signature).map_err(|_| reject(RejectionReason::Malformed))?;

        // Signature first: unauthenticated bytes are never parsed
        if !verify_hmac_sha256(&self.config.token_secret, payload.as_bytes(), &signature)? {
            return Err(reject(RejectionReason::BadSignature));
        }

        let json = from_base64url(payload).map_err(|_| reject(RejectionReason::Malformed))?;
        let claims: SessionClaims =
            serde_json::from_slice(&json).map_err(|_| reject(RejectionReason::Malformed))?;

        if claims.is_expired_at(now) {
            return Err(reject(RejectionReason::Expired));
        }

        Ok(claims)
    }
}
