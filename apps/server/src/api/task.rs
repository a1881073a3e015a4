//! Task API endpoints.

use std::sync::Arc;

use api_types::{
    CanEditTitleResponse, CreateTaskRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Paginated,
    TaskDto, TaskListParams, UpdateDescriptionRequest, UpdateStatusRequest, UpdateTaskRequest,
    UpdateTitleRequest,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use entities::{NewTask, TITLE_MAX_LEN, Task, TaskStatus};
use task_store::{TaskOrder, TaskQuery, TaskStore};

use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

/// Loads a task and checks the actor owns it.
async fn load_owned_task<S: TaskStore>(
    state: &AppState<S>,
    actor: AuthenticatedUser,
    task_id: i64,
) -> ServerResult<Task> {
    let task = state
        .store
        .get_task(task_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Task not found".to_string()))?;

    if task.user_id != actor.id {
        return Err(ServerError::PermissionDenied(
            "You do not have permission to access this task".to_string(),
        ));
    }
    Ok(task)
}

fn parse_status(value: &str) -> ServerResult<TaskStatus> {
    TaskStatus::parse(value).ok_or_else(|| {
        ServerError::validation(
            "status",
            format!("Invalid status '{value}'. Expected NEW, IN_PROGRESS or COMPLETED."),
        )
    })
}

fn validate_title(title: &str) -> ServerResult<()> {
    if title.trim().is_empty() {
        return Err(ServerError::validation("title", "Title is required."));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ServerError::validation(
            "title",
            format!("Title must be at most {TITLE_MAX_LEN} characters."),
        ));
    }
    Ok(())
}

/// Translates query-string parameters into a store query.
fn build_query(params: &TaskListParams) -> ServerResult<TaskQuery> {
    let status = match params.status.as_deref() {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };

    let order = match params.ordering.as_deref() {
        Some(value) => TaskOrder::parse(value).ok_or_else(|| {
            ServerError::validation("ordering", format!("Cannot order by '{value}'."))
        })?,
        None => TaskOrder::default(),
    };

    Ok(TaskQuery {
        status,
        search: params.search.clone().or_else(|| params.q.clone()),
        user_id: params.user_id,
        order,
        page: params.page.unwrap_or(1).max(1),
        page_size: params
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE),
    })
}

async fn run_query<S: TaskStore>(
    state: &AppState<S>,
    query: TaskQuery,
) -> ServerResult<Json<Paginated<TaskDto>>> {
    let (tasks, total) = state.store.list_tasks(query.clone()).await?;
    let results: Vec<TaskDto> = tasks.iter().map(TaskDto::from).collect();
    Ok(Json(Paginated::new(results, query.page, query.page_size, total)))
}

/// Lists tasks across all users, with filtering, search, ordering, and
/// pagination.
pub async fn list_tasks<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(_actor): Extension<AuthenticatedUser>,
    Query(params): Query<TaskListParams>,
) -> ServerResult<Json<Paginated<TaskDto>>> {
    let query = build_query(&params)?;
    run_query(&state, query).await
}

/// Lists only the authenticated user's tasks.
pub async fn my_tasks<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Query(params): Query<TaskListParams>,
) -> ServerResult<Json<Paginated<TaskDto>>> {
    let mut query = build_query(&params)?;
    query.user_id = Some(actor.id);
    run_query(&state, query).await
}

/// Searches tasks by title or description. The `q` parameter is required.
pub async fn search_tasks<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(_actor): Extension<AuthenticatedUser>,
    Query(params): Query<TaskListParams>,
) -> ServerResult<Json<Paginated<TaskDto>>> {
    if params.q.as_deref().map_or(true, |q| q.trim().is_empty()) {
        return Err(ServerError::InvalidRequest(
            "Search term 'q' is required".to_string(),
        ));
    }
    let query = build_query(&params)?;
    run_query(&state, query).await
}

/// Creates a task owned by the authenticated user.
pub async fn create_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTaskRequest>,
) -> ServerResult<(StatusCode, Json<TaskDto>)> {
    validate_title(&request.title)?;

    let status = match request.status.as_deref() {
        Some(value) => parse_status(value)?,
        None => TaskStatus::New,
    };

    let mut new_task = NewTask::new(actor.id, request.title).with_status(status);
    if let Some(description) = request.description {
        new_task = new_task.with_description(description);
    }

    let task = state.store.create_task(new_task).await?;
    tracing::info!(task_id = %task.id, user_id = %actor.id, "Task created");

    Ok((StatusCode::CREATED, Json(TaskDto::from(&task))))
}

/// Returns one of the authenticated user's tasks.
pub async fn get_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
) -> ServerResult<Json<TaskDto>> {
    let task = load_owned_task(&state, actor, task_id).await?;
    Ok(Json(TaskDto::from(&task)))
}

/// Applies requested field changes to a task, enforcing the title edit
/// window and status monotonicity.
fn apply_changes(task: &mut Task, changes: UpdateTaskRequest) -> ServerResult<()> {
    if let Some(title) = changes.title {
        if title != task.title {
            validate_title(&title)?;
            if !task.can_edit_title() {
                return Err(ServerError::PermissionDenied(
                    "Title can only be updated within 5 minutes of creation".to_string(),
                ));
            }
            task.title = title;
        }
    }

    if let Some(status) = changes.status {
        let status = parse_status(&status)?;
        if !task.can_transition_to(status) {
            return Err(ServerError::validation(
                "status",
                "Cannot set status back to NEW once task has progressed",
            ));
        }
        task.status = status;
    }

    if let Some(description) = changes.description {
        task.description = description;
    }

    Ok(())
}

/// Fully updates a task. The title is required; status and description are
/// left unchanged when omitted.
pub async fn update_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
    Json(request): Json<UpdateTaskRequest>,
) -> ServerResult<Json<TaskDto>> {
    if request.title.is_none() {
        return Err(ServerError::validation("title", "Title is required."));
    }

    let mut task = load_owned_task(&state, actor, task_id).await?;
    apply_changes(&mut task, request)?;

    let task = state.store.update_task(task).await?;
    Ok(Json(TaskDto::from(&task)))
}

/// Partially updates a task; only the provided fields change.
pub async fn patch_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
    Json(request): Json<UpdateTaskRequest>,
) -> ServerResult<Json<TaskDto>> {
    let mut task = load_owned_task(&state, actor, task_id).await?;
    apply_changes(&mut task, request)?;

    let task = state.store.update_task(task).await?;
    Ok(Json(TaskDto::from(&task)))
}

/// Deletes one of the authenticated user's tasks.
pub async fn delete_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
) -> ServerResult<StatusCode> {
    let task = load_owned_task(&state, actor, task_id).await?;
    state.store.delete_task(task.id).await?;

    tracing::info!(task_id = %task.id, user_id = %actor.id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Marks a task as completed.
pub async fn complete_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
) -> ServerResult<Json<TaskDto>> {
    let mut task = load_owned_task(&state, actor, task_id).await?;
    task.status = TaskStatus::Completed;

    let task = state.store.update_task(task).await?;
    Ok(Json(TaskDto::from(&task)))
}

/// Updates just the title, subject to the edit window.
///
/// Unlike PUT/PATCH on the task, this endpoint checks the window before
/// looking at the body, so even resending the current title is rejected
/// once the window has passed.
pub async fn update_title<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
    Json(request): Json<UpdateTitleRequest>,
) -> ServerResult<Json<TaskDto>> {
    let mut task = load_owned_task(&state, actor, task_id).await?;

    if !task.can_edit_title() {
        return Err(ServerError::PermissionDenied(
            "Title can only be updated within 5 minutes of creation".to_string(),
        ));
    }
    validate_title(&request.title)?;
    task.title = request.title;

    let task = state.store.update_task(task).await?;
    Ok(Json(TaskDto::from(&task)))
}

/// Updates just the description; `null` clears it.
pub async fn update_description<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
    Json(request): Json<UpdateDescriptionRequest>,
) -> ServerResult<Json<TaskDto>> {
    let mut task = load_owned_task(&state, actor, task_id).await?;
    task.description = request.description.unwrap_or_default();

    let task = state.store.update_task(task).await?;
    Ok(Json(TaskDto::from(&task)))
}

/// Updates just the status, subject to monotonicity.
pub async fn update_status<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> ServerResult<Json<TaskDto>> {
    let mut task = load_owned_task(&state, actor, task_id).await?;
    apply_changes(
        &mut task,
        UpdateTaskRequest {
            title: None,
            description: None,
            status: Some(request.status),
        },
    )?;

    let task = state.store.update_task(task).await?;
    Ok(Json(TaskDto::from(&task)))
}

/// Reports whether the task's title can still be edited, with the window
/// boundary timestamps.
pub async fn can_edit_title<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(task_id): Path<i64>,
) -> ServerResult<Json<CanEditTitleResponse>> {
    let task = load_owned_task(&state, actor, task_id).await?;

    Ok(Json(CanEditTitleResponse {
        can_edit: task.can_edit_title(),
        created_at: task.created_at,
        current_time: Utc::now(),
        cutoff_time: task.title_edit_deadline(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::{JwtConfig, MemoryTokenBlacklist, TokenManager};
    use chrono::Duration;
    use entities::NewUser;
    use task_store::MemoryTaskStore;

    use crate::config::Config;

    fn memory_state() -> Arc<AppState<MemoryTaskStore>> {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret-key-must-be-long-enough-for-security".to_string(),
            access_token_lifetime_secs: auth::DEFAULT_ACCESS_LIFETIME_SECS,
            refresh_token_lifetime_secs: auth::DEFAULT_REFRESH_LIFETIME_SECS,
            cookie_secure: false,
            log_level: "warn".to_string(),
        };
        let tokens = TokenManager::new(JwtConfig::new(&config.jwt_secret));
        Arc::new(AppState::new(
            config,
            MemoryTaskStore::new(),
            tokens,
            Arc::new(MemoryTokenBlacklist::new()),
        ))
    }

    fn task(status: TaskStatus, age: Duration) -> Task {
        let created = Utc::now() - age;
        Task {
            id: 1,
            user_id: 1,
            title: "Write report".to_string(),
            description: String::new(),
            status,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_title_change_outside_window_rejected() {
        let mut task = task(TaskStatus::New, Duration::minutes(10));
        let err = apply_changes(
            &mut task,
            UpdateTaskRequest {
                title: Some("New title".to_string()),
                description: None,
                status: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ServerError::PermissionDenied(_)));
    }

    #[test]
    fn test_unchanged_title_allowed_outside_window() {
        let mut task = task(TaskStatus::New, Duration::minutes(10));
        // Sending the current title back (as a PUT does) is not an edit.
        apply_changes(
            &mut task,
            UpdateTaskRequest {
                title: Some("Write report".to_string()),
                description: Some("notes".to_string()),
                status: None,
            },
        )
        .unwrap();
        assert_eq!(task.description, "notes");
    }

    #[test]
    fn test_status_regression_rejected() {
        let mut task = task(TaskStatus::InProgress, Duration::seconds(30));
        let err = apply_changes(
            &mut task,
            UpdateTaskRequest {
                title: None,
                description: None,
                status: Some("NEW".to_string()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ServerError::Validation { field: "status", .. }));
    }

    #[tokio::test]
    async fn test_title_endpoint_rejects_unchanged_title_after_window() {
        let state = memory_state();
        let user = state
            .store
            .create_user(NewUser::new("alice", "hash", "Alice"))
            .await
            .unwrap();
        let created = state
            .store
            .create_task(NewTask::new(user.id, "Report"))
            .await
            .unwrap();

        // Age the task past the window; the store keeps the caller's
        // created_at on update.
        let mut aged = created.clone();
        aged.created_at = Utc::now() - Duration::minutes(10);
        state.store.update_task(aged).await.unwrap();

        // The dedicated endpoint rejects before reading the body, so even
        // resending the current title is a 403.
        let err = update_title(
            State(state.clone()),
            Extension(AuthenticatedUser { id: user.id }),
            Path(created.id),
            Json(UpdateTitleRequest {
                title: "Report".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServerError::PermissionDenied(_)));
    }

    #[test]
    fn test_status_progression_allowed() {
        let mut task = task(TaskStatus::New, Duration::seconds(30));
        apply_changes(
            &mut task,
            UpdateTaskRequest {
                title: None,
                description: None,
                status: Some("IN_PROGRESS".to_string()),
            },
        )
        .unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
    }
}
