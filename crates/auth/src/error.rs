//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username/password pair did not match an active user. Deliberately
    /// carries no detail about which part was wrong.
    #[error("Unable to log in with provided credentials.")]
    InvalidCredentials,

    /// Token expired.
    #[error("Token expired")]
    TokenExpired,

    /// Invalid token (malformed, bad signature, wrong issuer or type).
    #[error("Invalid token")]
    InvalidToken,

    /// Token has been revoked via the blacklist.
    #[error("Token has been revoked")]
    TokenRevoked,

    /// JWT validation failed.
    #[error("JWT validation failed: {0}")]
    JwtValidation(String),

    /// JWT encoding failed.
    #[error("JWT encoding failed: {0}")]
    JwtEncoding(String),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Blacklist store failure.
    #[error("Blacklist error: {0}")]
    Blacklist(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidToken => AuthError::InvalidToken,
            _ => AuthError::JwtValidation(e.to_string()),
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
