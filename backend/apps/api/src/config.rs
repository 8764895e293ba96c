//! Server Configuration
//!
//! Everything the binary reads from the environment. `.env` is loaded by
//! `main` before this runs.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use platform::crypto::from_base64;
use squeak::AuthConfig;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const MAX_TOKEN_TTL_DAYS: u64 = 3650;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

/// Which store backend to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub store: StoreBackend,
    pub auth: AuthConfig,
    pub frontend_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map)
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let listen_addr = var("SQUEAK_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("SQUEAK_LISTEN_ADDR must be host:port")?;

        let store = Self::store_backend(&var)?;
        let auth = Self::auth_config(&var)?;

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            listen_addr,
            store,
            auth,
            frontend_origins,
        })
    }

    fn store_backend(var: &impl Fn(&str) -> Option<String>) -> anyhow::Result<StoreBackend> {
        let database_url = var("DATABASE_URL");
        let kind = var("SQUEAK_STORE").unwrap_or_else(|| {
            if database_url.is_some() {
                "postgres".to_string()
            } else {
                "memory".to_string()
            }
        });

        match kind.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" => {
                let database_url =
                    database_url.context("DATABASE_URL must be set for the postgres store")?;
                let max_connections = match var("SQUEAK_DB_MAX_CONNECTIONS") {
                    Some(raw) => raw
                        .parse()
                        .context("SQUEAK_DB_MAX_CONNECTIONS must be a positive integer")?,
                    None => DEFAULT_DB_MAX_CONNECTIONS,
                };
                if max_connections == 0 {
                    bail!("SQUEAK_DB_MAX_CONNECTIONS must be at least 1");
                }
                Ok(StoreBackend::Postgres {
                    database_url,
                    max_connections,
                })
            }
            other => bail!("SQUEAK_STORE must be 'memory' or 'postgres', got '{}'", other),
        }
    }

    fn auth_config(var: &impl Fn(&str) -> Option<String>) -> anyhow::Result<AuthConfig> {
        let mut auth = if cfg!(debug_assertions) {
            AuthConfig::development()
        } else {
            AuthConfig::default()
        };

        match var("SQUEAK_TOKEN_SECRET") {
            Some(secret_b64) => {
                let bytes = from_base64(secret_b64.trim())
                    .context("SQUEAK_TOKEN_SECRET must be base64")?;
                auth.token_secret = bytes.as_slice().try_into().map_err(|_| {
                    anyhow::anyhow!(
                        "SQUEAK_TOKEN_SECRET must decode to 32 bytes, got {}",
                        bytes.len()
                    )
                })?;
            }
            None if cfg!(debug_assertions) => {
                tracing::warn!("SQUEAK_TOKEN_SECRET not set, using a random secret");
            }
            None => bail!("SQUEAK_TOKEN_SECRET must be set in production"),
        }

        if let Some(days) = var("SQUEAK_TOKEN_TTL_DAYS") {
            let days: u64 = days
                .parse()
                .context("SQUEAK_TOKEN_TTL_DAYS must be a positive integer")?;
            if !(1..=MAX_TOKEN_TTL_DAYS).contains(&days) {
                bail!(
                    "SQUEAK_TOKEN_TTL_DAYS must be between 1 and {}, got {}",
                    MAX_TOKEN_TTL_DAYS,
                    days
                );
            }
            let secs = days
                .checked_mul(24 * 3600)
                .context("SQUEAK_TOKEN_TTL_DAYS is too large")?;
            auth.token_ttl = Duration::from_secs(secs);
        }

        if let Some(secure) = var("SQUEAK_COOKIE_SECURE") {
            auth.cookie_secure = secure
                .parse()
                .context("SQUEAK_COOKIE_SECURE must be true or false")?;
        }

        auth.password_pepper = var("SQUEAK_PASSWORD_PEPPER")
            .filter(|p| !p.is_empty())
            .map(String::into_bytes);

        Ok(auth)
    }
}
