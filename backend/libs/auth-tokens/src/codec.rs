//! Symmetric signing and verification of token payloads
//!
//! Tokens are compact JWS strings (`header.payload.signature`, base64url)
//! signed with HS256. The codec knows nothing about token roles or
//! revocation: it binds an arbitrary JSON object plus an `exp` claim to the
//! secret, and reports signature/structure failures separately from expiry.

use crate::error::{TokenError, TokenResult};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// HS256 only; a key change invalidates every previously issued token.
const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Name of the expiry claim (Unix seconds).
pub const EXPIRY_CLAIM: &str = "exp";

/// A token whose signature and structure have been verified.
///
/// Expiry has *not* been checked yet.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    pub claims: Map<String, Value>,
    pub exp: i64,
}

impl VerifiedToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// Signs and verifies tokens with a single shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &TOKEN_ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is judged by `decode_at` after the signature is known good.
        validation.validate_exp = false;
        // Registered claim names in the payload are application data.
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation.required_spec_claims.insert(EXPIRY_CLAIM.to_string());

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign `claims` with an absolute expiry.
    ///
    /// Any `exp` key already present in `claims` is overwritten.
    pub fn encode(
        &self,
        mut claims: Map<String, Value>,
        expires_at: DateTime<Utc>,
    ) -> TokenResult<String> {
        claims.insert(EXPIRY_CLAIM.to_string(), Value::from(expires_at.timestamp()));

        encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and structure only, tolerating expiry.
    pub fn verify(&self, token: &str) -> TokenResult<VerifiedToken> {
        let token_data = decode::<Map<String, Value>>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => debug!("Token signature mismatch"),
                    other => debug!(reason = ?other, "Token failed structural verification"),
                }
                TokenError::Malformed
            })?;

        let exp = token_data
            .claims
            .get(EXPIRY_CLAIM)
            .and_then(Value::as_i64)
            .ok_or(TokenError::Malformed)?;

        Ok(VerifiedToken {
            claims: token_data.claims,
            exp,
        })
    }

    /// Verify and check expiry against the current clock.
    pub fn decode(&self, token: &str) -> TokenResult<Map<String, Value>> {
        self.decode_at(token, Utc::now())
    }

    /// Verify and check expiry against `now`.
    ///
    /// Expiry is only reported for correctly signed tokens, so `Expired` and
    /// `Malformed` never overlap.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> TokenResult<Map<String, Value>> {
        let verified = self.verify(token)?;
        if verified.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(verified.claims)
    }
}
