//! API endpoints.

pub mod auth;
pub mod task;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use task_store::TaskStore;

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Creates the API router with all endpoints.
///
/// Everything except registration, login, refresh, logout, and the health
/// check sits behind the access-token middleware.
pub fn create_router<S: TaskStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/health", get(health_check));

    let protected = Router::new()
        .route("/api/auth/me", get(auth::me).put(auth::update_me))
        .route("/api/tasks", get(task::list_tasks).post(task::create_task))
        .route("/api/tasks/my", get(task::my_tasks))
        .route("/api/tasks/search", get(task::search_tasks))
        .route(
            "/api/tasks/:id",
            get(task::get_task)
                .put(task::update_task)
                .patch(task::patch_task)
                .delete(task::delete_task),
        )
        .route("/api/tasks/:id/complete", post(task::complete_task))
        .route("/api/tasks/:id/title", patch(task::update_title))
        .route("/api/tasks/:id/description", patch(task::update_description))
        .route("/api/tasks/:id/status", patch(task::update_status))
        .route("/api/tasks/:id/can-edit-title", get(task::can_edit_title))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware::<S>));

    public.merge(protected).with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
