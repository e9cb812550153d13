use super::{token_fingerprint, with_timeout, RevocationStore, DEFAULT_STORE_TIMEOUT};
use crate::error::{TokenError, TokenResult};
use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, info};

const CREATE_REVOKED_TOKENS_SQL: &str =
    include_str!("../../migrations/0001_create_revoked_tokens.sql");

/// Persistent blacklist in the `revoked_tokens` table.
///
/// The table's primary key on `token` serializes concurrent writers; inserts
/// use `ON CONFLICT DO NOTHING` instead of read-then-write.
#[derive(Clone)]
pub struct PostgresRevocationStore {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresRevocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create the `revoked_tokens` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> TokenResult<()> {
        sqlx::query(CREATE_REVOKED_TOKENS_SQL)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RevocationStore for PostgresRevocationStore {
    async fn contains(&self, token: &str) -> TokenResult<bool> {
        with_timeout(self.timeout, "contains", async {
            sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token = $1)
                "#,
            )
            .bind(token)
            .fetch_one(&self.pool)
            .await
            .map_err(TokenError::from)
        })
        .await
    }

    async fn revoke(&self, token: &str) -> TokenResult<()> {
        let result = with_timeout(self.timeout, "revoke", async {
            sqlx::query(
                r#"
                INSERT INTO revoked_tokens (token)
                VALUES ($1)
                ON CONFLICT (token) DO NOTHING
                "#,
            )
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(TokenError::from)
        })
        .await?;

        let fingerprint = token_fingerprint(token);
        if result.rows_affected() > 0 {
            info!(token = %fingerprint, "Token added to blacklist");
        } else {
            debug!(token = %fingerprint, "Token already blacklisted");
        }
        Ok(())
    }
}
