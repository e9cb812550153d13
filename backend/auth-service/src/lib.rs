// Auth Service Library

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod security;
pub mod services;


pub use config::{Config, RevocationBackend};
pub use error::{AuthError, Result};
pub use models::{AuthOutcome, TokenPair, User, UserProfile};
pub use services::AuthService;

use anyhow::Context;
use auth_tokens::{
    InMemoryRevocationStore, PostgresRevocationStore, RedisRevocationStore, RevocationStore,
    TokenClassifier, TokenCodec, TokenValidator,
};
use db::{InMemoryUserStore, UserStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Wire the token subsystem and the configured revocation backend.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::with_user_store(config, Arc::new(InMemoryUserStore::new())).await
    }

    pub async fn with_user_store(
        config: &Config,
        users: Arc<dyn UserStore>,
    ) -> anyhow::Result<Self> {
        let codec = TokenCodec::new(config.jwt_token_secret.as_bytes());
        let classifier = Arc::new(TokenClassifier::new(codec, config.token_settings()));
        let store = build_revocation_store(config).await?;

        let validator = TokenValidator::new(classifier, store);
        Ok(Self {
            auth: Arc::new(AuthService::new(users, validator)),
        })
    }
}

async fn build_revocation_store(config: &Config) -> anyhow::Result<Arc<dyn RevocationStore>> {
    let timeout = config.revocation_timeout();

    let store: Arc<dyn RevocationStore> = match config.revocation_backend {
        RevocationBackend::Memory => Arc::new(InMemoryRevocationStore::new()),
        RevocationBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is required for the redis backend")?;
            let client = redis::Client::open(url).context("Invalid REDIS_URL")?;
            let manager = redis::aio::ConnectionManager::new(client)
                .await
                .context("Failed to connect to Redis")?;
            Arc::new(RedisRevocationStore::new(manager).with_timeout(timeout))
        }
        RevocationBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .acquire_timeout(timeout)
                .connect(url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            let store = PostgresRevocationStore::new(pool).with_timeout(timeout);
            store
                .ensure_schema()
                .await
                .context("Failed to create revoked_tokens table")?;
            Arc::new(store)
        }
    };

    info!(backend = ?config.revocation_backend, "Revocation store ready");
    Ok(store)
}
