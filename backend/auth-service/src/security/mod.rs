/// Security module for authentication
/// Provides password hashing; token handling lives in the shared auth-tokens library
pub use auth_tokens::{TokenClaims, TokenType};

pub mod password;

pub use password::{hash_password, verify_password};
