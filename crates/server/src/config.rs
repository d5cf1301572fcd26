//! Server configuration

use std::env;
use std::sync::Arc;

use tracing::warn;

use crate::auth::token::TokenManager;
use crate::auth::AuthManager;
use crate::store::TeamStore;

const DEV_SECRET: &str = "crewdeck-dev-signing-key";

/// Configuration for the coordination server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// SQLite connection string
    pub database_url: String,
    /// Port the HTTP listener binds to
    pub port: u16,
    /// Process-wide token signing key
    pub jwt_secret: String,
    /// Bearer token lifetime in minutes
    pub token_ttl_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://crewdeck.db".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            jwt_secret: env::var("SECRET_KEY").unwrap_or_else(|_| DEV_SECRET.to_string()),
            token_ttl_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl ServerConfig {
    /// Build configuration from the environment
    pub fn from_env() -> Self {
        let config = Self::default();
        if config.jwt_secret == DEV_SECRET {
            warn!("SECRET_KEY not set, using the development signing key");
        }
        config
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub auth: Arc<AuthManager>,
    pub tokens: Arc<TokenManager>,
    pub store: Arc<TeamStore>,
}
