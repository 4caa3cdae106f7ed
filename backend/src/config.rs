//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;

/// Mount point of the booking routes when `BOOKINGS_BASE_PATH` is unset or invalid
pub const DEFAULT_BASE_PATH: &str = "/api/bookings";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Path the booking routes are mounted under
    pub base_path: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite database location (`sqlite:` prefix optional)
    pub url: String,
    /// Connection pool ceiling
    pub max_connections: u32,
    /// Optional JSON file of employees and services loaded at startup
    pub seed_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 8080,
                host: "0.0.0.0".to_string(),
                base_path: DEFAULT_BASE_PATH.to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite:data/clinic.db".to_string(),
                max_connections: 5,
                seed_file: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
                host: env::var("HOST").unwrap_or(defaults.server.host),
                base_path: normalize_base_path(env::var("BOOKINGS_BASE_PATH").ok().as_deref()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|n| n.parse().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or(defaults.database.max_connections),
                seed_file: env::var_os("SEED_FILE").map(PathBuf::from),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Validate a configured mount path
///
/// The path must start with `/`, name at least one segment and hold no
/// route parameters (`:` or `*`); a trailing slash is dropped. Anything else
/// falls back to [`DEFAULT_BASE_PATH`].
pub fn normalize_base_path(raw: Option<&str>) -> String {
    match raw.map(|p| p.trim().trim_end_matches('/')) {
        Some(path)
            if path.starts_with('/')
                && path.len() > 1
                && !path.contains(|c: char| c == ':' || c == '*') =>
        {
            path.to_string()
        }
        _ => DEFAULT_BASE_PATH.to_string(),
    }
}
