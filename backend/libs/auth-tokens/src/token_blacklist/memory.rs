use super::{token_fingerprint, RevocationStore};
use crate::error::TokenResult;
use async_trait::async_trait;
use dashmap::DashSet;
use tracing::{debug, info};

/// Process-local blacklist.
///
/// `DashSet::insert` is atomic per key, so concurrent revocations of the same
/// token leave exactly one member. Only suitable when a single process
/// validates tokens.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    tokens: DashSet<String>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct revoked tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn contains(&self, token: &str) -> TokenResult<bool> {
        Ok(self.tokens.contains(token))
    }

    async fn revoke(&self, token: &str) -> TokenResult<()> {
        let fingerprint = token_fingerprint(token);
        if self.tokens.insert(token.to_string()) {
            info!(token = %fingerprint, "Token added to blacklist");
        } else {
            debug!(token = %fingerprint, "Token already blacklisted");
        }
        Ok(())
    }
}
