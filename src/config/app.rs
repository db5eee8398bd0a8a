//! Application configuration loading from config.toml
//!
//! This module loads the application-level settings: the database URL and the
//! current school year. The school year is resolved once at startup and passed
//! explicitly to the operations that need it; there is no global mutable
//! "current year" state anywhere in the crate.

use crate::config::database::get_database_url;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
struct ConfigFile {
    /// Optional database URL override; `DATABASE_URL` env wins over this
    database_url: Option<String>,
    /// Current school year, e.g. "2025/2026"
    tanev: String,
}

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,
    /// Current school year, e.g. "2025/2026"
    pub tanev: String,
}

/// Loads application configuration from a TOML file, resolving the database
/// URL against the `DATABASE_URL` environment variable.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let parsed: ConfigFile = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if parsed.tanev.trim().is_empty() {
        return Err(Error::Config {
            message: "tanev cannot be empty".to_string(),
        });
    }

    let database_url = std::env::var("DATABASE_URL")
        .ok()
        .or(parsed.database_url)
        .unwrap_or_else(get_database_url);

    Ok(AppConfig {
        database_url,
        tanev: parsed.tanev,
    })
}

/// Loads application configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<AppConfig> {
    load_config("config.toml")
}
