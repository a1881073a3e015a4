//! Task store trait definition.

use async_trait::async_trait;
use entities::{NewTask, NewUser, Task, User};

use crate::{TaskQuery, TaskStoreResult};

/// Trait for user and task storage operations.
///
/// Implementations must enforce the uniqueness invariants atomically:
/// usernames are unique case-insensitively, `(user, title)` is unique per
/// task, and deleting a user deletes that user's tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user. Fails with [`UsernameTaken`] on a collision.
    ///
    /// [`UsernameTaken`]: crate::TaskStoreError::UsernameTaken
    async fn create_user(&self, user: NewUser) -> TaskStoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: i64) -> TaskStoreResult<Option<User>>;

    /// Gets a user by exact username.
    async fn get_user_by_username(&self, username: &str) -> TaskStoreResult<Option<User>>;

    /// Updates a user's mutable fields.
    async fn update_user(&self, user: User) -> TaskStoreResult<User>;

    /// Deletes a user and, by cascade, all of that user's tasks.
    async fn delete_user(&self, id: i64) -> TaskStoreResult<()>;

    // =========================================================================
    // Task operations
    // =========================================================================

    /// Creates a new task. Fails with [`DuplicateTitle`] if the owner
    /// already has a task with this title.
    ///
    /// [`DuplicateTitle`]: crate::TaskStoreError::DuplicateTitle
    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task>;

    /// Gets a task by ID.
    async fn get_task(&self, id: i64) -> TaskStoreResult<Option<Task>>;

    /// Lists tasks matching `query`, returning the page of results and the
    /// total match count across all pages.
    async fn list_tasks(&self, query: TaskQuery) -> TaskStoreResult<(Vec<Task>, u64)>;

    /// Updates a task. Title changes are subject to the same
    /// [`DuplicateTitle`] rule as creation.
    ///
    /// [`DuplicateTitle`]: crate::TaskStoreError::DuplicateTitle
    async fn update_task(&self, task: Task) -> TaskStoreResult<Task>;

    /// Deletes a task permanently.
    async fn delete_task(&self, id: i64) -> TaskStoreResult<()>;
}
