//! Access / refresh token roles
//!
//! The role travels inside the signed payload as `token_type`, next to the
//! application claims under `data`:
//!
//! ```json
//! {"data": {"id": 7, "username": "alice"}, "token_type": "access", "exp": 1735689600}
//! ```
//!
//! Swapping the role therefore requires forging the signature.

use crate::codec::{TokenCodec, VerifiedToken};
use crate::error::{TokenError, TokenResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::info;

pub const DATA_CLAIM: &str = "data";
pub const TOKEN_TYPE_CLAIM: &str = "token_type";

pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
pub const DEFAULT_REFRESH_TOKEN_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded payload of a typed token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Application claims, carried verbatim
    pub data: Value,
    pub token_type: TokenType,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    fn from_verified(verified: VerifiedToken) -> TokenResult<Self> {
        serde_json::from_value(Value::Object(verified.claims)).map_err(|_| TokenError::Malformed)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Lifetimes of the two token roles, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSettings {
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            access_ttl_minutes: DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
            refresh_ttl_minutes: DEFAULT_REFRESH_TOKEN_TTL_MINUTES,
        }
    }
}

impl TokenSettings {
    pub fn ttl_minutes(&self, token_type: TokenType) -> i64 {
        match token_type {
            TokenType::Access => self.access_ttl_minutes,
            TokenType::Refresh => self.refresh_ttl_minutes,
        }
    }
}

/// Issues and decodes role-tagged tokens on top of [`TokenCodec`].
#[derive(Debug, Clone)]
pub struct TokenClassifier {
    codec: TokenCodec,
    settings: TokenSettings,
}

impl TokenClassifier {
    pub fn new(codec: TokenCodec, settings: TokenSettings) -> Self {
        Self { codec, settings }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// Issue a token of `token_type` expiring `ttl_minutes` from now.
    ///
    /// A zero or negative TTL yields a token that is already expired. A TTL
    /// whose expiry falls outside the representable date range is rejected
    /// with `Signing`.
    pub fn issue(&self, claims: &Value, token_type: TokenType, ttl_minutes: i64) -> TokenResult<String> {
        let mut payload = Map::new();
        payload.insert(DATA_CLAIM.to_string(), claims.clone());
        payload.insert(
            TOKEN_TYPE_CLAIM.to_string(),
            Value::from(token_type.as_str()),
        );

        let expires_at = Duration::try_minutes(ttl_minutes)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                TokenError::Signing(format!("TTL of {} minutes is out of range", ttl_minutes))
            })?;
        let token = self.codec.encode(payload, expires_at)?;

        info!(
            token_type = %token_type,
            exp = expires_at.timestamp(),
            "Token issued"
        );
        Ok(token)
    }

    /// Issue a token of `token_type` with the configured TTL for that role.
    pub fn issue_typed(&self, claims: &Value, token_type: TokenType) -> TokenResult<String> {
        self.issue(claims, token_type, self.settings.ttl_minutes(token_type))
    }

    pub fn issue_access(&self, claims: &Value) -> TokenResult<String> {
        self.issue_typed(claims, TokenType::Access)
    }

    pub fn issue_refresh(&self, claims: &Value) -> TokenResult<String> {
        self.issue_typed(claims, TokenType::Refresh)
    }

    /// Decode `token` and require it to carry `expected` as its role.
    pub fn decode_as(&self, token: &str, expected: TokenType) -> TokenResult<TokenClaims> {
        self.decode_as_at(token, expected, Utc::now())
    }

    pub(crate) fn decode_as_at(
        &self,
        token: &str,
        expected: TokenType,
        now: DateTime<Utc>,
    ) -> TokenResult<TokenClaims> {
        let verified = self.codec.verify(token)?;
        if verified.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        let claims = TokenClaims::from_verified(verified)?;
        if claims.token_type != expected {
            return Err(TokenError::WrongType {
                expected,
                actual: claims.token_type,
            });
        }

        Ok(claims)
    }
}
