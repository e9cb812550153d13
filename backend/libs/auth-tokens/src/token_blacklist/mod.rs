//! Token blacklist backing revocation
//!
//! A flat set of revoked token strings. Membership is by exact string match,
//! insertion is idempotent, and nothing is ever removed by this crate.
//!
//! Backends:
//! - [`InMemoryRevocationStore`]: single process, `DashSet`
//! - [`RedisRevocationStore`]: `SET NX` on a per-token key
//! - [`PostgresRevocationStore`]: unique-keyed table, `ON CONFLICT DO NOTHING`
//!
//! Every backend call is bounded by a timeout; a timeout or driver failure
//! surfaces as [`TokenError::StorageUnavailable`], never as "not revoked".

use crate::error::{TokenError, TokenResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::time::Duration;
use tracing::error;

mod memory;
mod postgres_store;
mod redis_store;

pub use memory::InMemoryRevocationStore;
pub use postgres_store::PostgresRevocationStore;
pub use redis_store::RedisRevocationStore;

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// Membership set of revoked tokens, shared by every request worker.
///
/// Implementations must make a completed `revoke(x)` visible to every later
/// `contains(x)`, from any worker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Whether `token` has been revoked.
    async fn contains(&self, token: &str) -> TokenResult<bool>;

    /// Add `token` to the set. Revoking an already revoked token succeeds.
    async fn revoke(&self, token: &str) -> TokenResult<()>;
}

/// SHA-256 fingerprint of a token, safe to log or use as a storage key.
pub fn token_fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Run a store operation under `timeout`, mapping expiry of the deadline to
/// `StorageUnavailable`.
pub(crate) async fn with_timeout<T, F>(
    timeout: Duration,
    operation: &'static str,
    fut: F,
) -> TokenResult<T>
where
    F: Future<Output = TokenResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            error!(
                operation,
                timeout_ms = timeout.as_millis() as u64,
                "Revocation store call timed out"
            );
            Err(TokenError::StorageUnavailable(format!(
                "{} timed out after {}ms",
                operation,
                timeout.as_millis()
            )))
        }
    }
}
