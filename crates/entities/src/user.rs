//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum username length accepted at registration.
pub const USERNAME_MIN_LEN: usize = 4;

/// Maximum username length accepted at registration.
pub const USERNAME_MAX_LEN: usize = 100;

/// Minimum raw password length, checked before hashing.
pub const PASSWORD_MIN_LEN: usize = 6;

/// A registered user.
///
/// Usernames are unique case-insensitively; the store enforces this with a
/// unique constraint, not just an application-level pre-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned by the store.
    pub id: i64,
    /// Unique username.
    pub username: String,
    /// Salted password hash. Never the raw password.
    pub password_hash: String,
    /// First name (required).
    pub first_name: String,
    /// Last name (optional, empty string when absent).
    pub last_name: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A user record ready for insertion; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    /// Creates a new user record.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: String::new(),
        }
    }

    /// Sets the last name.
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = NewUser::new("alice", "$argon2id$stub", "Alice");

        assert_eq!(user.username, "alice");
        assert_eq!(user.last_name, "");

        let user = user.with_last_name("Liddell");
        assert_eq!(user.last_name, "Liddell");
    }
}
