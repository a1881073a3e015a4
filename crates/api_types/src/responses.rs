//! Response body types.

use chrono::{DateTime, Utc};
use entities::{Task, User};
use serde::{Deserialize, Serialize};

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Wire representation of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            user_id: task.user_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.as_str().to_string(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Returned by registration: the profile plus both tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserProfile,
    pub access: String,
    pub refresh: String,
}

/// Returned by login. The refresh token travels in the cookie, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub access: String,
}

/// Returned by a successful refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    pub user: UserProfile,
}

/// Generic human-readable acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Returned by `GET /api/tasks/{id}/can-edit-title`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanEditTitleResponse {
    pub can_edit: bool,
    pub created_at: DateTime<Utc>,
    pub current_time: DateTime<Utc>,
    pub cutoff_time: DateTime<Utc>,
}
