use crate::db::UserStore;
use crate::error::{AuthError, Result};
use crate::models::{AuthOutcome, TokenPair, User};
use crate::security::{hash_password, verify_password, TokenClaims, TokenType};
use auth_tokens::{token_fingerprint, TokenClassifier, TokenValidator};
use std::sync::Arc;
use tracing::{info, warn};

/// Register / login / logout use cases on top of the token subsystem
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    validator: TokenValidator,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, validator: TokenValidator) -> Self {
        Self { users, validator }
    }

    fn classifier(&self) -> &TokenClassifier {
        self.validator.classifier()
    }

    /// Mint an access + refresh pair carrying the same claims payload
    fn issue_pair(&self, user: &User) -> Result<AuthOutcome> {
        let profile = user.profile();
        let claims = profile.to_claims();

        let access_token = self.classifier().issue_access(&claims)?;
        let refresh_token = self.classifier().issue_refresh(&claims)?;

        Ok(AuthOutcome {
            user: profile,
            authorization: TokenPair {
                access_token,
                refresh_token,
            },
        })
    }

    pub async fn register(
        &self,
        username: &str,
        password1: &str,
        password2: &str,
    ) -> Result<AuthOutcome> {
        if username.trim().is_empty() {
            return Err(AuthError::Validation("username must not be empty".to_string()));
        }
        if password1.is_empty() {
            return Err(AuthError::Validation("password must not be empty".to_string()));
        }
        if password1 != password2 {
            return Err(AuthError::MismatchedPasswords);
        }

        let password_hash = hash_password(password1)?;
        let user = self.users.create_user(username, &password_hash).await?;

        info!(user_id = user.id, "User registered");
        self.issue_pair(&user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthOutcome> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown username");
                return Err(AuthError::WrongCredentials);
            }
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(AuthError::WrongCredentials);
        }

        info!(user_id = user.id, "User logged in");
        self.issue_pair(&user)
    }

    /// Blacklist both tokens of a session.
    ///
    /// Only signature and structure are checked, so already expired tokens are
    /// accepted. Logging out twice with the same pair succeeds both times.
    pub async fn logout(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        if !self.validator.is_well_formed(access_token) {
            warn!(token = %token_fingerprint(access_token), "Logout with invalid access token");
            return Err(AuthError::InvalidAccessToken);
        }
        if !self.validator.is_well_formed(refresh_token) {
            warn!(token = %token_fingerprint(refresh_token), "Logout with invalid refresh token");
            return Err(AuthError::InvalidRefreshToken);
        }

        self.validator.revoke(access_token).await?;
        self.validator.revoke(refresh_token).await?;

        info!(
            access = %token_fingerprint(access_token),
            refresh = %token_fingerprint(refresh_token),
            "Session logged out"
        );
        Ok(())
    }

    /// Claims of a currently usable access token
    pub async fn authenticate(&self, access_token: &str) -> Result<TokenClaims> {
        let claims = self
            .validator
            .validate(access_token, TokenType::Access)
            .await?;
        Ok(claims)
    }

    /// New access token for a currently usable refresh token.
    ///
    /// The refresh token itself is not rotated.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let claims = self
            .validator
            .validate(refresh_token, TokenType::Refresh)
            .await?;

        let access_token = self.classifier().issue_access(&claims.data)?;
        info!(refresh = %token_fingerprint(refresh_token), "Access token refreshed");
        Ok(access_token)
    }
}
