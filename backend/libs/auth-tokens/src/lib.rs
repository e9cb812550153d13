//! Bearer token issuance, validation and revocation
//!
//! **Components**:
//! - [`TokenCodec`]: HS256 signing / verification of a payload plus `exp`
//! - [`TokenClassifier`]: `access` / `refresh` roles inside the signed payload
//! - [`RevocationStore`]: idempotent blacklist (memory, Redis, PostgreSQL)
//! - [`TokenValidator`]: decode + expiry + role + blacklist in one decision
//!
//! Verification is stateless: any holder of the secret can check a token
//! without calling the issuer. The blacklist is the only shared state.
//!
//! ```no_run
//! use auth_tokens::{
//!     InMemoryRevocationStore, TokenClassifier, TokenCodec, TokenSettings, TokenType,
//!     TokenValidator,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn run() -> auth_tokens::TokenResult<()> {
//! let classifier = Arc::new(TokenClassifier::new(
//!     TokenCodec::new(b"J8Kq2mPvRx4TnZs9YwLcGf7DhBe3Xa6W"),
//!     TokenSettings::default(),
//! ));
//! let validator = TokenValidator::new(classifier.clone(), Arc::new(InMemoryRevocationStore::new()));
//!
//! let token = classifier.issue_access(&json!({"user_id": 7}))?;
//! let claims = validator.validate(&token, TokenType::Access).await?;
//! assert_eq!(claims.data, json!({"user_id": 7}));
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod codec;
pub mod error;
pub mod secret_validation;
pub mod token_blacklist;
pub mod validator;

#[cfg(test)]
mod test_utils;

pub use classifier::{TokenClaims, TokenClassifier, TokenSettings, TokenType};
pub use codec::{TokenCodec, VerifiedToken};
pub use error::{TokenError, TokenResult};
pub use secret_validation::{validate_secret_strength, SecretStrength};
pub use token_blacklist::{
    token_fingerprint, InMemoryRevocationStore, PostgresRevocationStore, RedisRevocationStore,
    RevocationStore,
};
pub use validator::TokenValidator;
