//! To-do list web service.
//!
//! A multi-user to-do list API: registration and token-based authentication
//! (access/refresh JWT pair, refresh token in an HTTP-only cookie) plus CRUD
//! over per-user tasks with filtering, search, ordering, and pagination.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use auth::{JwtConfig, TokenBlacklist, TokenManager};
use axum::Router;
use task_store::TaskStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::state::AppState;

/// Creates the application router with all routes configured.
pub fn create_app<S: TaskStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the application state with the given configuration, store, and
/// blacklist.
pub fn create_state<S: TaskStore>(
    config: Config,
    store: S,
    blacklist: Arc<dyn TokenBlacklist>,
) -> Arc<AppState<S>> {
    let jwt_config = JwtConfig::new(&config.jwt_secret)
        .with_access_lifetime_secs(config.access_token_lifetime_secs)
        .with_refresh_lifetime_secs(config.refresh_token_lifetime_secs);
    let tokens = TokenManager::new(jwt_config);

    Arc::new(AppState::new(config, store, tokens, blacklist))
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
