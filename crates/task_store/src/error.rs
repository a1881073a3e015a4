//! Task store error types.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Username is already taken (case-insensitive comparison).
    #[error("a user with that username already exists")]
    UsernameTaken,

    /// The owner already has a task with this title.
    #[error("you already have a task with this title")]
    DuplicateTitle,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl TaskStoreError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }
}

/// Result type for store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;
