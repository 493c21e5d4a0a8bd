use std::time::Duration;

use nomnomchow_ai::AiConfig;
use nomnomchow_core::batch::DEFAULT_THROTTLE;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Shared admin password. Admin endpoints answer with a configuration
    /// error while it is unset.
    pub admin_password: Option<String>,
    /// Session token configuration.
    pub jwt: JwtConfig,
    /// Pause between two images of a batch run (default: 4 s).
    pub batch_throttle: Duration,
    /// Image and chat provider settings.
    pub ai: AiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `ADMIN_PASSWORD`       | unset                      |
    /// | `BATCH_THROTTLE_MS`    | `4000`                     |
    ///
    /// See [`JwtConfig::from_env`] and [`AiConfig::from_env`] for the rest.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let admin_password = std::env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty());
        if admin_password.is_none() {
            tracing::error!("ADMIN_PASSWORD is not set; admin endpoints will refuse requests");
        }

        let batch_throttle = std::env::var("BATCH_THROTTLE_MS")
            .ok()
            .map(|v| v.parse::<u64>().expect("BATCH_THROTTLE_MS must be a valid u64"))
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_THROTTLE);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            admin_password,
            jwt: JwtConfig::from_env(),
            batch_throttle,
            ai: AiConfig::from_env(),
        }
    }
}
