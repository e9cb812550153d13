use auth_tokens::TokenError;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Passwords do not match")]
    MismatchedPasswords,

    #[error("Username is not available")]
    UnavailableUsername,

    #[error("Wrong credentials")]
    WrongCredentials,

    #[error("Invalid access token")]
    InvalidAccessToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// Expired, malformed, wrongly typed and revoked tokens all end up here.
    #[error("Invalid credential")]
    InvalidCredential,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl AuthError {
    /// Stable machine-readable code for `{"errors": [{"code": ...}]}` bodies
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MismatchedPasswords => "mismatched_passwords",
            AuthError::UnavailableUsername => "unavailable_username",
            AuthError::WrongCredentials => "wrong_credentials",
            AuthError::InvalidAccessToken => "invalid_access_token",
            AuthError::InvalidRefreshToken => "invalid_refresh_token",
            AuthError::InvalidCredential => "invalid_credential",
            AuthError::ServiceUnavailable(_) => "service_unavailable",
            AuthError::Validation(_) => "validation_error",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Suggested HTTP status for an outer transport layer
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MismatchedPasswords | AuthError::Validation(_) => 422,
            AuthError::UnavailableUsername => 409,
            AuthError::WrongCredentials => 404,
            AuthError::InvalidAccessToken
            | AuthError::InvalidRefreshToken
            | AuthError::InvalidCredential => 401,
            AuthError::ServiceUnavailable(_) => 503,
            AuthError::Internal(_) => 500,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        if err.is_credential_failure() {
            debug!(reason = err.kind(), "Collapsing token failure to invalid credential");
            return AuthError::InvalidCredential;
        }

        match err {
            TokenError::StorageUnavailable(msg) => AuthError::ServiceUnavailable(msg),
            other => AuthError::Internal(other.to_string()),
        }
    }
}
