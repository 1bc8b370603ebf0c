//! Pathlog server binary.
//!
//! Loads a pre-produced path calculation event log into memory and serves
//! the read-only query API over HTTP.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from environment variables
//! 2. Initialize structured logging (tracing)
//! 3. Load the event log (an unreadable log yields an empty store)
//! 4. Serve the query API until `Ctrl-C` or `SIGTERM`

mod config;
mod error;

use std::sync::Arc;

use pathlog_core::{EventStore, summary};
use pathlog_observer::{AppState, start_server};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};
use crate::error::AppError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the server cannot
/// bind its listener.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration.
    let config = AppConfig::from_env()?;

    // 2. Initialize structured logging.
    init_logging(config.log_format);
    info!("pathlog-server starting");
    info!(
        host = config.server.host,
        port = config.server.port,
        events_file = %config.events_file.display(),
        log_format = ?config.log_format,
        "Configuration loaded"
    );

    // 3. Load the event log once; the store is immutable from here on.
    let store = EventStore::load(&config.events_file);
    debug!(event_counts = ?summary::event_counts(&store), "Event log contents");

    // 4. Serve.
    let state = Arc::new(AppState::new(store));
    start_server(&config.server, state).await?;

    info!("pathlog-server stopped");
    Ok(())
}

/// Install the global tracing subscriber.
fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
