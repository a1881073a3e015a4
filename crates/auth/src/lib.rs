//! Authentication for the to-do list service.
//!
//! This crate provides:
//! - Access/refresh JWT pair generation and validation
//! - Password hashing and verification
//! - The refresh-token blacklist used for logout/revocation

mod blacklist;
mod error;
mod jwt;
mod password;

pub use blacklist::*;
pub use error::*;
pub use jwt::*;
pub use password::*;

/// Default access token lifetime in seconds (1 day).
pub const DEFAULT_ACCESS_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Default refresh token lifetime in seconds (14 days).
pub const DEFAULT_REFRESH_LIFETIME_SECS: i64 = 14 * 24 * 60 * 60;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "todo-service";
