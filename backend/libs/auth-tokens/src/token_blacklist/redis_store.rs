use super::{token_fingerprint, with_timeout, RevocationStore, DEFAULT_STORE_TIMEOUT};
use crate::error::{TokenError, TokenResult};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{debug, info};

const KEY_PREFIX: &str = "token:blacklist:";

/// Token blacklist using Redis
///
/// **Key format**: `token:blacklist:{sha256(token)}`
/// **TTL**: none. Entries live for the key epoch; pruning entries whose token
/// has expired is left to an external job.
#[derive(Clone)]
pub struct RedisRevocationStore {
    redis: ConnectionManager,
    timeout: Duration,
}

impl RedisRevocationStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self {
            redis,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn key(token: &str) -> String {
        format!("{}{}", KEY_PREFIX, token_fingerprint(token))
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn contains(&self, token: &str) -> TokenResult<bool> {
        let key = Self::key(token);
        let mut conn = self.redis.clone();

        with_timeout(self.timeout, "contains", async move {
            conn.exists::<_, bool>(&key).await.map_err(TokenError::from)
        })
        .await
    }

    async fn revoke(&self, token: &str) -> TokenResult<()> {
        let key = Self::key(token);
        let mut conn = self.redis.clone();

        // SET NX: the first writer wins, later writers are no-ops.
        let inserted = with_timeout(self.timeout, "revoke", async {
            conn.set_nx::<_, _, bool>(&key, 1).await.map_err(TokenError::from)
        })
        .await?;

        let fingerprint = &key[KEY_PREFIX.len()..];
        if inserted {
            info!(token = %fingerprint, "Token added to blacklist");
        } else {
            debug!(token = %fingerprint, "Token already blacklisted");
        }
        Ok(())
    }
}
