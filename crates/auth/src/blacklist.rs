//! Refresh-token blacklist.
//!
//! Revocation is keyed on the token's `jti`. Entries carry the token's
//! expiry so the set can be pruned; a pruned entry is safe to drop because
//! the token it named is already rejected by expiry validation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::AuthResult;

/// Persisted set of revoked refresh-token identifiers.
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Marks a token as revoked. Revoking an already-revoked token is a
    /// no-op, so logout stays idempotent.
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> AuthResult<()>;

    /// Returns true if the token has been revoked.
    async fn is_revoked(&self, jti: &str) -> AuthResult<bool>;
}

/// In-memory blacklist for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryTokenBlacklist {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl MemoryTokenBlacklist {
    /// Creates a new empty blacklist.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenBlacklist for MemoryTokenBlacklist {
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> AuthResult<()> {
        let mut entries = self.entries.write().await;
        let now = Utc::now();
        entries.retain(|_, exp| *exp > now);
        entries.insert(jti.to_string(), expires_at);
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> AuthResult<bool> {
        let entries = self.entries.read().await;
        Ok(entries.contains_key(jti))
    }
}

/// SQLite-backed blacklist sharing the application's database.
#[cfg(feature = "sqlx")]
#[derive(Debug, Clone)]
pub struct SqliteTokenBlacklist {
    pool: sqlx::SqlitePool,
}

#[cfg(feature = "sqlx")]
impl SqliteTokenBlacklist {
    /// Wraps an existing connection pool.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    /// Ensures the revocation table exists.
    pub async fn init(&self) -> AuthResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS revoked_tokens (
                jti TEXT PRIMARY KEY,
                expires_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| crate::AuthError::Blacklist(e.to_string()))?;
        Ok(())
    }
}

#[cfg(feature = "sqlx")]
#[async_trait]
impl TokenBlacklist for SqliteTokenBlacklist {
    async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> AuthResult<()> {
        // Single atomic statement; a concurrent refresh for the same jti
        // either sees the row or raced ahead of the revocation.
        sqlx::query("INSERT OR IGNORE INTO revoked_tokens (jti, expires_at) VALUES (?, ?)")
            .bind(jti)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| crate::AuthError::Blacklist(e.to_string()))?;
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> AuthResult<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM revoked_tokens WHERE jti = ? LIMIT 1")
                .bind(jti)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| crate::AuthError::Blacklist(e.to_string()))?;
        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_revoke_and_check() {
        let blacklist = MemoryTokenBlacklist::new();
        let expires = Utc::now() + Duration::days(14);

        assert!(!blacklist.is_revoked("jti-1").await.unwrap());
        blacklist.revoke("jti-1", expires).await.unwrap();
        assert!(blacklist.is_revoked("jti-1").await.unwrap());
        assert!(!blacklist.is_revoked("jti-2").await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let blacklist = MemoryTokenBlacklist::new();
        let expires = Utc::now() + Duration::days(14);

        blacklist.revoke("jti-1", expires).await.unwrap();
        blacklist.revoke("jti-1", expires).await.unwrap();
        assert!(blacklist.is_revoked("jti-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_entries_are_pruned() {
        let blacklist = MemoryTokenBlacklist::new();

        blacklist
            .revoke("stale", Utc::now() - Duration::minutes(1))
            .await
            .unwrap();
        // The next write sweeps entries whose token has already expired.
        blacklist
            .revoke("fresh", Utc::now() + Duration::days(14))
            .await
            .unwrap();

        assert!(!blacklist.is_revoked("stale").await.unwrap());
        assert!(blacklist.is_revoked("fresh").await.unwrap());
    }

    #[cfg(feature = "sqlx")]
    #[tokio::test]
    async fn test_sqlite_revoke_and_check() {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        let blacklist = SqliteTokenBlacklist::new(pool);
        blacklist.init().await.unwrap();

        let expires = Utc::now() + Duration::days(14);
        blacklist.revoke("jti-1", expires).await.unwrap();
        blacklist.revoke("jti-1", expires).await.unwrap();

        assert!(blacklist.is_revoked("jti-1").await.unwrap());
        assert!(!blacklist.is_revoked("jti-2").await.unwrap());
    }
}
