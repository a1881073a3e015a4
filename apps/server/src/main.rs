//! To-do list server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use auth::SqliteTokenBlacklist;
use task_store::SqliteTaskStore;
use todo_server::{config::Config, create_app, create_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::info!("Starting to-do list server");

    // Open the store; schema and constraints are created on connect
    let store = SqliteTaskStore::connect(&config.database_url).await?;

    // The blacklist shares the store's database
    let blacklist = SqliteTokenBlacklist::new(store.pool().clone());
    blacklist.init().await?;

    // Create application state and router
    let state = create_state(config.clone(), store, Arc::new(blacklist));
    let app = create_app(state);

    // Parse server address
    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(addr = %addr, "Server listening");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
