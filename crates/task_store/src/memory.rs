//! In-memory task store implementation for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use entities::{NewTask, NewUser, Task, User};
use tokio::sync::RwLock;

use crate::{TaskOrderField, TaskQuery, TaskStore, TaskStoreError, TaskStoreResult};

/// In-memory task store for testing purposes.
///
/// Mirrors the constraint semantics of [`SqliteTaskStore`](crate::SqliteTaskStore):
/// case-insensitive username uniqueness, per-owner title uniqueness, and
/// cascade delete of a user's tasks.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    users: Arc<RwLock<HashMap<i64, User>>>,
    tasks: Arc<RwLock<HashMap<i64, Task>>>,
    next_user_id: AtomicI64,
    next_task_id: AtomicI64,
}

impl MemoryTaskStore {
    /// Creates a new in-memory task store.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            tasks: Arc::new(RwLock::new(HashMap::new())),
            next_user_id: AtomicI64::new(1),
            next_task_id: AtomicI64::new(1),
        }
    }
}

/// Applies the filter portion of `query` to one task.
fn matches(task: &Task, query: &TaskQuery) -> bool {
    if let Some(status) = query.status {
        if task.status != status {
            return false;
        }
    }
    if let Some(user_id) = query.user_id {
        if task.user_id != user_id {
            return false;
        }
    }
    if let Some(term) = &query.search {
        let term = term.to_lowercase();
        if !task.title.to_lowercase().contains(&term)
            && !task.description.to_lowercase().contains(&term)
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: NewUser) -> TaskStoreResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(TaskStoreError::UsernameTaken);
        }

        let now = Utc::now();
        let user = User {
            id: self.next_user_id.fetch_add(1, Ordering::SeqCst),
            username: user.username,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> TaskStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> TaskStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, mut user: User) -> TaskStoreResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(TaskStoreError::not_found("User", user.id.to_string()));
        }
        user.updated_at = Utc::now();
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> TaskStoreResult<()> {
        let mut users = self.users.write().await;
        if users.remove(&id).is_none() {
            return Err(TaskStoreError::not_found("User", id.to_string()));
        }
        // Cascade: a deleted user leaves no orphaned tasks behind.
        let mut tasks = self.tasks.write().await;
        tasks.retain(|_, task| task.user_id != id);
        Ok(())
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        if tasks
            .values()
            .any(|t| t.user_id == task.user_id && t.title == task.title)
        {
            return Err(TaskStoreError::DuplicateTitle);
        }

        let now = Utc::now();
        let task = Task {
            id: self.next_task_id.fetch_add(1, Ordering::SeqCst),
            user_id: task.user_id,
            title: task.title,
            description: task.description,
            status: task.status,
            created_at: now,
            updated_at: now,
        };
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: i64) -> TaskStoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, query: TaskQuery) -> TaskStoreResult<(Vec<Task>, u64)> {
        let tasks = self.tasks.read().await;
        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| matches(t, &query))
            .cloned()
            .collect();

        result.sort_by(|a, b| {
            let ord = match query.order.field {
                TaskOrderField::CreatedAt => a.created_at.cmp(&b.created_at),
                TaskOrderField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                TaskOrderField::Status => a.status.as_str().cmp(b.status.as_str()),
                TaskOrderField::Title => a.title.cmp(&b.title),
            };
            if query.order.descending {
                ord.reverse()
            } else {
                ord
            }
        });

        let total = result.len() as u64;
        let page: Vec<Task> = result
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .collect();

        Ok((page, total))
    }

    async fn update_task(&self, mut task: Task) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        if !tasks.contains_key(&task.id) {
            return Err(TaskStoreError::not_found("Task", task.id.to_string()));
        }
        if tasks
            .values()
            .any(|t| t.id != task.id && t.user_id == task.user_id && t.title == task.title)
        {
            return Err(TaskStoreError::DuplicateTitle);
        }
        task.updated_at = Utc::now();
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete_task(&self, id: i64) -> TaskStoreResult<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.remove(&id).is_none() {
            return Err(TaskStoreError::not_found("Task", id.to_string()));
        }
        Ok(())
    }
}
