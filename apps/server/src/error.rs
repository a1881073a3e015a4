//! Server error types and their HTTP mapping.

use auth::AuthError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use task_store::TaskStoreError;

use api_types::error_codes;

/// Server error type.
///
/// Every variant maps to a stable `{status, code, message}` triple; internal
/// detail (database messages, JWT library errors) never reaches the caller
/// beyond the variant's own message.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Field-scoped validation failure.
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    /// No usable credential was presented.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Authentication error (invalid credential or token).
    #[error("{0}")]
    Auth(AuthError),

    /// Authenticated but not allowed to touch this resource.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Creates a field-scoped validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<TaskStoreError> for ServerError {
    fn from(e: TaskStoreError) -> Self {
        match e {
            // Unique-constraint conflicts are the caller's input problem.
            TaskStoreError::UsernameTaken => {
                Self::validation("username", "A user with that username already exists.")
            }
            TaskStoreError::DuplicateTitle => {
                Self::validation("title", "You already have a task with this title")
            }
            TaskStoreError::NotFound { entity_type, id } => {
                Self::NotFound(format!("{entity_type} not found: {id}"))
            }
            TaskStoreError::Database(e) => Self::Internal(e.to_string()),
            TaskStoreError::Other(msg) => Self::Internal(msg),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(e: AuthError) -> Self {
        match e {
            // Server-side failures, not credential problems.
            AuthError::JwtEncoding(_) | AuthError::PasswordHash(_) | AuthError::Blacklist(_) => {
                Self::Internal(e.to_string())
            }
            _ => Self::Auth(e),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, error_codes::INVALID_REQUEST, msg.clone())
            }
            ServerError::Validation { message, .. } => {
                (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, message.clone())
            }
            ServerError::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                error_codes::AUTHENTICATION_REQUIRED,
                "Authentication required".to_string(),
            ),
            ServerError::Auth(e) => {
                (StatusCode::UNAUTHORIZED, error_codes::AUTHENTICATION_FAILED, e.to_string())
            }
            ServerError::PermissionDenied(msg) => {
                (StatusCode::FORBIDDEN, error_codes::PERMISSION_DENIED, msg.clone())
            }
            ServerError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, error_codes::RESOURCE_NOT_FOUND, msg.clone())
            }
            ServerError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INTERNAL_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": error_code,
            "message": message,
        });
        if let ServerError::Validation { field, .. } = &self {
            error["field"] = json!(field);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
