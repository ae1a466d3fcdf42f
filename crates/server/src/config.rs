//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CARIT_HOST` - Bind address (default: 127.0.0.1)
//! - `CARIT_PORT` - Listen port (default: 3000)
//! - `CARIT_ALLOWED_ORIGIN` - Browser origin allowed by CORS
//!   (default: <https://localhost:5173>, the Vue dev server)
//! - `CARIT_DEFAULT_EXPERIENCE_LEVEL` - Experience level assigned to new
//!   users; the literal `unset` leaves the level null (default: 1)
//! - `CARIT_DATA_FILE` - Path of the JSON snapshot the document store loads
//!   at startup and writes on shutdown (default: none, purely in-memory)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CARIT server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Browser origin allowed to call the API with credentials
    pub allowed_origin: HeaderValue,
    /// Experience level given to newly created users (None = left unset)
    pub default_experience_level: Option<i32>,
    /// Snapshot file for the document store, if persistence is wanted
    pub data_file: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            allowed_origin: HeaderValue::from_static("https://localhost:5173"),
            default_experience_level: Some(1),
            data_file: None,
            sentry_dsn: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is present but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = read_var("CARIT_HOST") {
            config.host = host
                .parse()
                .map_err(|e| invalid("CARIT_HOST", format!("{e}")))?;
        }

        if let Some(port) = read_var("CARIT_PORT") {
            config.port = port
                .parse()
                .map_err(|e| invalid("CARIT_PORT", format!("{e}")))?;
        }

        if let Some(origin) = read_var("CARIT_ALLOWED_ORIGIN") {
            config.allowed_origin = HeaderValue::from_str(&origin)
                .map_err(|e| invalid("CARIT_ALLOWED_ORIGIN", format!("{e}")))?;
        }

        if let Some(level) = read_var("CARIT_DEFAULT_EXPERIENCE_LEVEL") {
            config.default_experience_level = if level.eq_ignore_ascii_case("unset") {
                None
            } else {
                Some(
                    level
                        .parse()
                        .map_err(|e| invalid("CARIT_DEFAULT_EXPERIENCE_LEVEL", format!("{e}")))?,
                )
            };
        }

        config.data_file = read_var("CARIT_DATA_FILE").map(PathBuf::from);
        config.sentry_dsn = read_var("SENTRY_DSN");

        Ok(config)
    }

    /// The socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Read an environment variable, treating empty values as unset.
fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn invalid(name: &str, message: String) -> ConfigError {
    ConfigError::InvalidEnvVar(name.to_owned(), message)
}
