//! Request body and query-string types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Auth requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body for `PUT /api/auth/me`. Only name fields are client-editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

// ============================================================================
// Task requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    /// One of NEW, IN_PROGRESS, COMPLETED. Defaults to NEW.
    pub status: Option<String>,
}

/// Body for `PUT`/`PATCH /api/tasks/{id}`. `PUT` additionally requires
/// `title` to be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTitleRequest {
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDescriptionRequest {
    /// Missing or null clears the description.
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Query parameters accepted by every task listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListParams {
    /// Status equality filter (NEW, IN_PROGRESS, COMPLETED).
    pub status: Option<String>,
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
    /// Free-text term for the dedicated search endpoint.
    pub q: Option<String>,
    /// Scope the listing to one owner's tasks.
    pub user_id: Option<i64>,
    /// Ordering field, optionally `-`-prefixed for descending.
    /// One of created_at, updated_at, status, title. Default: -created_at.
    pub ordering: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Items per page, capped at [`MAX_PAGE_SIZE`](crate::MAX_PAGE_SIZE).
    pub page_size: Option<u32>,
}
