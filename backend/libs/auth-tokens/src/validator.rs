//! Single pass/fail decision for a presented credential
//!
//! `validate` runs, in order and short-circuiting:
//! 1. signature + structure (`Malformed`)
//! 2. expiry (`Expired`)
//! 3. role (`WrongType`)
//! 4. blacklist membership (`Revoked`, or `StorageUnavailable` when the store
//!    cannot answer)
//!
//! A store failure never lets a token through.
//!
//! `is_well_formed` only runs step 1 and tolerates expiry. Logout uses it so
//! a client can still blacklist a token that has already expired. Future
//! `exp` values get no special treatment there, and neither does clock skew.

use crate::classifier::{TokenClaims, TokenClassifier, TokenType};
use crate::error::{TokenError, TokenResult};
use crate::token_blacklist::{token_fingerprint, RevocationStore};
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Clone)]
pub struct TokenValidator {
    classifier: Arc<TokenClassifier>,
    store: Arc<dyn RevocationStore>,
}

impl TokenValidator {
    pub fn new(classifier: Arc<TokenClassifier>, store: Arc<dyn RevocationStore>) -> Self {
        Self { classifier, store }
    }

    pub fn classifier(&self) -> &TokenClassifier {
        &self.classifier
    }

    /// Is `token` currently usable as `expected`?
    pub async fn validate(&self, token: &str, expected: TokenType) -> TokenResult<TokenClaims> {
        let claims = match self.classifier.decode_as(token, expected) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(
                    token = %token_fingerprint(token),
                    expected = %expected,
                    reason = e.kind(),
                    "Token rejected"
                );
                return Err(e);
            }
        };

        match self.store.contains(token).await {
            Ok(false) => Ok(claims),
            Ok(true) => {
                warn!(
                    token = %token_fingerprint(token),
                    expected = %expected,
                    reason = TokenError::Revoked.kind(),
                    "Token rejected"
                );
                Err(TokenError::Revoked)
            }
            Err(e) => {
                error!(
                    token = %token_fingerprint(token),
                    error = %e,
                    "Revocation lookup failed, rejecting token"
                );
                if matches!(e, TokenError::StorageUnavailable(_)) {
                    Err(e)
                } else {
                    Err(TokenError::StorageUnavailable(e.to_string()))
                }
            }
        }
    }

    /// Signature and structure check only; expired tokens pass.
    ///
    /// Does not consult the revocation store.
    pub fn is_well_formed(&self, token: &str) -> bool {
        self.classifier.codec().verify(token).is_ok()
    }

    /// Add `token` to the blacklist. Idempotent.
    pub async fn revoke(&self, token: &str) -> TokenResult<()> {
        self.store.revoke(token).await
    }
}
