//! Application configuration.
//!
//! Settings come from an optional `config.toml` next to the executable, with
//! environment overrides (loaded from `.env` by the binary via `dotenvy`):
//! `ORDER_DESK_CONFIG` points at an alternative config file and
//! `ORDER_DESK_DB` overrides the database path. A missing config file is not
//! an error; every field has a default suited to a local install.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{env, fs, path::Path};

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the SQLite database file
    pub database_path: String,
    /// Directory timestamped export files are written into
    pub export_dir: String,
    /// Path of the append-only action log
    pub action_log_path: String,
    /// Settings for the optional AI summary feature
    pub ai: AiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "data/order_desk.sqlite".to_string(),
            export_dir: "exports".to_string(),
            action_log_path: "logs/app.log".to_string(),
            ai: AiConfig::default(),
        }
    }
}

/// Connection settings for the locally hosted LLM endpoint.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AiConfig {
    /// Base URL of the Ollama-compatible server
    pub endpoint: String,
    /// Model name passed in the generate request
    pub model: String,
    /// Timeout applied to the outbound HTTP call
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "phi3".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Parses configuration from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref)
        .map_err(|e| Error::Config(format!("Failed to read config file {path_ref:?}: {e}")))?;
    toml::from_str(&contents).map_err(|e| {
        Error::Config(format!(
            "Failed to parse TOML from config file {path_ref:?}: {e}"
        ))
    })
}

/// Loads the effective configuration: file (if present) plus env overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let config_path =
        env::var("ORDER_DESK_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

    let mut config = if Path::new(&config_path).exists() {
        load_config(&config_path)?
    } else {
        tracing::info!("No config file at '{}', using defaults.", config_path);
        AppConfig::default()
    };

    if let Ok(db_path) = env::var("ORDER_DESK_DB") {
        config.database_path = db_path;
    }

    Ok(config)
}
