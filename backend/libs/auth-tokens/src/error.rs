//! Failure taxonomy for token issuance, validation and revocation

use crate::classifier::TokenType;
use thiserror::Error;

pub type TokenResult<T> = std::result::Result<T, TokenError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Signature does not verify, the structure cannot be parsed, or a
    /// required field is missing.
    #[error("Malformed token")]
    Malformed,

    /// Correctly signed, but `exp` has passed.
    #[error("Token expired")]
    Expired,

    /// Correctly signed and unexpired, but minted for another role.
    #[error("Wrong token type: expected {expected}, got {actual}")]
    WrongType {
        expected: TokenType,
        actual: TokenType,
    },

    /// Correctly signed, unexpired and typed, but present in the blacklist.
    #[error("Token revoked")]
    Revoked,

    /// The revocation store could not answer (driver error or timeout).
    #[error("Revocation store unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// True for the four symbolic credential failures a caller must collapse
    /// into a single "invalid credential" signal.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            TokenError::Malformed
                | TokenError::Expired
                | TokenError::WrongType { .. }
                | TokenError::Revoked
        )
    }

    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::Expired => "expired",
            TokenError::WrongType { .. } => "wrong_type",
            TokenError::Revoked => "revoked",
            TokenError::StorageUnavailable(_) => "storage_unavailable",
            TokenError::Signing(_) => "signing",
        }
    }
}

impl From<redis::RedisError> for TokenError {
    fn from(err: redis::RedisError) -> Self {
        TokenError::StorageUnavailable(err.to_string())
    }
}

impl From<sqlx::Error> for TokenError {
    fn from(err: sqlx::Error) -> Self {
        TokenError::StorageUnavailable(err.to_string())
    }
}
