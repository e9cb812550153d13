/// Data models
pub mod user;

pub use user::{User, UserProfile};

use serde::{Deserialize, Serialize};

/// Access + refresh token pair minted on register / login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Response body of register / login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthOutcome {
    pub user: UserProfile,
    pub authorization: TokenPair,
}
