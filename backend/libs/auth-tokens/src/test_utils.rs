//! Test utilities for revocation backend tests
//!
//! Provides Redis / PostgreSQL connections with proper error handling so
//! tests can skip when the service is not running.

use anyhow::{anyhow, Result};
use redis::aio::ConnectionManager;
use redis::Client;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Get Redis connection for testing
///
/// Uses REDIS_TEST_URL environment variable or defaults to localhost
pub async fn get_test_redis_connection() -> Result<ConnectionManager> {
    let redis_url =
        env::var("REDIS_TEST_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

    let client = Client::open(redis_url)
        .map_err(|e| anyhow!("Failed to create Redis client: {}", e))?;

    tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
        .await
        .map_err(|_| anyhow!("Timed out connecting to Redis"))?
        .map_err(|e| anyhow!("Failed to connect to Redis: {}", e))
}

/// Get PostgreSQL pool for testing
///
/// Requires DATABASE_TEST_URL; there is no default database.
pub async fn get_test_pg_pool() -> Result<PgPool> {
    let database_url =
        env::var("DATABASE_TEST_URL").map_err(|_| anyhow!("DATABASE_TEST_URL not set"))?;

    PgPoolOptions::new()
        .max_connections(4)
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to PostgreSQL: {}", e))
}
