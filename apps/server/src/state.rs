//! Application state.

use std::sync::Arc;

use auth::{TokenBlacklist, TokenManager};
use task_store::TaskStore;

use crate::config::Config;

/// Shared application state.
pub struct AppState<S: TaskStore> {
    /// Server configuration.
    pub config: Config,
    /// User and task store.
    pub store: S,
    /// Token issuance and validation.
    pub tokens: TokenManager,
    /// Revoked refresh-token set.
    pub blacklist: Arc<dyn TokenBlacklist>,
}

impl<S: TaskStore> AppState<S> {
    /// Creates new application state.
    pub fn new(
        config: Config,
        store: S,
        tokens: TokenManager,
        blacklist: Arc<dyn TokenBlacklist>,
    ) -> Self {
        Self {
            config,
            store,
            tokens,
            blacklist,
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;
