//! Crewdeck Coordination Server Library
//!
//! Axum HTTP API over SQLite: bearer-token auth, tasks, announcements,
//! comments, and file metadata.

pub mod auth;
pub mod config;
pub mod ctx;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod store;

// Re-exports for convenience
pub use config::{AppState, ServerConfig};
pub use ctx::Ctx;
pub use error::{Error, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use auth::token::TokenManager;
use auth::AuthManager;
use store::TeamStore;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("server=info,tower_http=info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        // Already set, ignore
    }

    let config = ServerConfig::from_env();

    info!("=== Crewdeck Server ===");
    info!("Database: {}", config.database_url);

    let pool = store::connect(&config.database_url).await?;

    let auth = Arc::new(AuthManager::new(pool.clone()).await?);
    info!("Auth Manager initialized");

    let tokens = Arc::new(TokenManager::new(
        &config.jwt_secret,
        config.token_ttl_minutes,
    ));

    let team_store = Arc::new(TeamStore::new(pool.clone()).await?);
    info!("Team Store initialized");

    let port = config.port;
    let state = AppState {
        config,
        auth,
        tokens,
        store: team_store,
    };

    let app = router::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
