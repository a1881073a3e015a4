//! Server configuration.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL.
    pub database_url: String,
    /// Secret used to sign access and refresh tokens. Required.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub access_token_lifetime_secs: i64,
    /// Refresh token lifetime in seconds (also the cookie max-age).
    pub refresh_token_lifetime_secs: i64,
    /// Whether the refresh cookie carries the Secure flag. Disable only for
    /// plain-HTTP local development.
    pub cookie_secure: bool,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("TODO_JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("TODO_JWT_SECRET is required"))?;

        Ok(Self {
            host: env::var("TODO_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("TODO_SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:todo.db?mode=rwc".to_string()),
            jwt_secret,
            access_token_lifetime_secs: env::var("TODO_ACCESS_TOKEN_LIFETIME_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(auth::DEFAULT_ACCESS_LIFETIME_SECS),
            refresh_token_lifetime_secs: env::var("TODO_REFRESH_TOKEN_LIFETIME_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(auth::DEFAULT_REFRESH_LIFETIME_SECS),
            cookie_secure: env::var("TODO_COOKIE_SECURE")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
            log_level: env::var("TODO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
