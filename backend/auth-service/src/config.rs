/// Configuration management
///
/// Loaded from the process environment (optionally seeded from a `.env`
/// file). Variable names are the upper-cased field names.
use anyhow::{bail, Context, Result};
use auth_tokens::{validate_secret_strength, SecretStrength, TokenSettings};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::warn;
use zeroize::Zeroize;

/// Upper bound for either token TTL: one year
const MAX_TOKEN_TTL_MINUTES: i64 = 366 * 24 * 60;

fn default_access_token_minutes_ttl() -> i64 {
    auth_tokens::classifier::DEFAULT_ACCESS_TOKEN_TTL_MINUTES
}

fn default_refresh_token_minutes_ttl() -> i64 {
    auth_tokens::classifier::DEFAULT_REFRESH_TOKEN_TTL_MINUTES
}

fn default_revocation_timeout_ms() -> u64 {
    2000
}

/// Where revoked tokens are recorded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum RevocationBackend {
    /// Process-local; only correct for a single instance
    #[default]
    Memory,
    Redis,
    Postgres,
}

impl TryFrom<String> for RevocationBackend {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(RevocationBackend::Memory),
            "redis" => Ok(RevocationBackend::Redis),
            "postgres" | "postgresql" => Ok(RevocationBackend::Postgres),
            other => Err(format!(
                "unknown revocation backend '{}', expected memory, redis or postgres",
                other
            )),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct Config {
    /// HS256 signing secret, wiped on drop
    pub jwt_token_secret: String,
    #[serde(default = "default_access_token_minutes_ttl")]
    pub access_token_minutes_ttl: i64,
    #[serde(default = "default_refresh_token_minutes_ttl")]
    pub refresh_token_minutes_ttl: i64,
    #[serde(default)]
    pub revocation_backend: RevocationBackend,
    pub redis_url: Option<String>,
    pub database_url: Option<String>,
    #[serde(default = "default_revocation_timeout_ms")]
    pub revocation_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config: Config =
            envy::from_env().context("Failed to load configuration from environment")?;
        config.validate()?;
        Ok(config)
    }

    /// Same as [`Config::from_env`] over an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::from_iter(vars).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, ttl) in [
            ("ACCESS_TOKEN_MINUTES_TTL", self.access_token_minutes_ttl),
            ("REFRESH_TOKEN_MINUTES_TTL", self.refresh_token_minutes_ttl),
        ] {
            if ttl <= 0 || ttl > MAX_TOKEN_TTL_MINUTES {
                bail!(
                    "{} must be between 1 and {} minutes, got {}",
                    name,
                    MAX_TOKEN_TTL_MINUTES,
                    ttl
                );
            }
        }
        if self.revocation_timeout_ms == 0 {
            bail!("REVOCATION_TIMEOUT_MS must be positive");
        }

        match validate_secret_strength(&self.jwt_token_secret) {
            SecretStrength::Weak => bail!(
                "JWT_TOKEN_SECRET is too weak: use at least 32 random bytes"
            ),
            SecretStrength::Acceptable => {
                warn!("JWT_TOKEN_SECRET is acceptable but not strong; 64+ random bytes recommended")
            }
            SecretStrength::Strong => {}
        }

        match self.revocation_backend {
            RevocationBackend::Redis if self.redis_url.is_none() => {
                bail!("REDIS_URL is required when REVOCATION_BACKEND=redis")
            }
            RevocationBackend::Postgres if self.database_url.is_none() => {
                bail!("DATABASE_URL is required when REVOCATION_BACKEND=postgres")
            }
            _ => Ok(()),
        }
    }

    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            access_ttl_minutes: self.access_token_minutes_ttl,
            refresh_ttl_minutes: self.refresh_token_minutes_ttl,
        }
    }

    pub fn revocation_timeout(&self) -> Duration {
        Duration::from_millis(self.revocation_timeout_ms)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("jwt_token_secret", &"[REDACTED]")
            .field("access_token_minutes_ttl", &self.access_token_minutes_ttl)
            .field("refresh_token_minutes_ttl", &self.refresh_token_minutes_ttl)
            .field("revocation_backend", &self.revocation_backend)
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[SET]"))
            .field("database_url", &self.database_url.as_ref().map(|_| "[SET]"))
            .field("revocation_timeout_ms", &self.revocation_timeout_ms)
            .finish()
    }
}

impl Drop for Config {
    fn drop(&mut self) {
        self.jwt_token_secret.zeroize();
    }
}
