//! Application Configuration
//!
//! Configuration for the squeak application layer.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::PasswordPolicy;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Default bearer token lifetime (30 days)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 3600);

/// Auth configuration shared by registration, login and the posting gate
#[derive(Clone)]
pub struct AuthConfig {
    /// Token cookie name
    pub cookie_name: String,
    /// Token secret key for HMAC signing (32 bytes)
    pub token_secret: [u8; 32],
    /// Token lifetime; also the cookie Max-Age
    pub token_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Length bounds for new passwords
    pub password_policy: PasswordPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "Authorization".to_string(),
            token_secret: [0u8; 32],
            token_ttl: DEFAULT_TOKEN_TTL,
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            password_policy: PasswordPolicy::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Token TTL in milliseconds, `None` if it does not fit an `i64`
    pub fn token_ttl_ms(&self) -> Option<i64> {
        i64::try_from(self.token_ttl.as_millis()).ok()
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Cookie attributes for the token cookie
    pub fn token_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.token_ttl.as_secs()),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("cookie_name", &self.cookie_name)
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("password_policy", &self.password_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.cookie_name, "Authorization");
        assert_eq!(config.token_ttl.as_secs(), 2_592_000);
        assert_eq!(config.token_ttl_ms(), Some(2_592_000_000));
        assert!(config.cookie_secure);
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_oversized_ttl_has_no_millis() {
        let config = AuthConfig {
            token_ttl: Duration::MAX,
            ..AuthConfig::default()
        };
        assert_eq!(config.token_ttl_ms(), None);
    }

    #[test]
    fn test_random_secret_differs() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_ne!(a.token_secret, b.token_secret);
        assert_ne!(a.token_secret, [0u8; 32]);
    }

    #[test]
    fn test_cookie_max_age_matches_ttl() {
        let config = AuthConfig::development();
        let cookie = config.token_cookie().build_set_cookie("t");
        assert!(cookie.starts_with("Authorization=t"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AuthConfig {
            token_secret: [7u8; 32],
            password_pepper: Some(b"pepper".to_vec()),
            ..AuthConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("112, 101"));
        assert!(!debug.contains("7, 7"));
    }
}
