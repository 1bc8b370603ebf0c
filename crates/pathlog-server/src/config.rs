//! Configuration for the server binary.
//!
//! All configuration is loaded from environment variables once at
//! startup:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PORT` | `3000` | TCP port to listen on |
//! | `HOST` | `0.0.0.0` | Address to bind |
//! | `PATHLOG_EVENTS_FILE` | `../parsed_log.json` | Event log loaded at startup |
//! | `LOG_FORMAT` | `pretty` | `pretty` or `json` |
//!
//! Log filtering itself is controlled by `RUST_LOG`.

use std::path::PathBuf;
use std::str::FromStr;

use pathlog_observer::ServerConfig;

/// Default location of the event log, relative to the working directory.
const DEFAULT_EVENTS_FILE: &str = "../parsed_log.json";

/// Errors that can occur when reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be used.
    #[error("invalid {var}: {message}")]
    Invalid {
        /// Name of the environment variable.
        var: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format `{other}`, expected `pretty` or `json`")),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listener address.
    pub server: ServerConfig,
    /// Path of the JSON event log.
    pub events_file: PathBuf,
    /// Log output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `PORT` or `LOG_FORMAT` is set
    /// to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `PORT` or `LOG_FORMAT` is set
    /// to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                message: format!("`{raw}`: {e}"),
            })?,
            None => defaults.port,
        };

        let host = lookup("HOST").unwrap_or(defaults.host);

        let events_file = lookup("PATHLOG_EVENTS_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_EVENTS_FILE), PathBuf::from);

        let log_format = lookup("LOG_FORMAT")
            .map(|raw| raw.parse::<LogFormat>())
            .transpose()
            .map_err(|message| ConfigError::Invalid {
                var: "LOG_FORMAT",
                message,
            })?
            .unwrap_or_default();

        Ok(Self {
            server: ServerConfig { host, port },
            events_file,
            log_format,
        })
    }
}
