//! Error types for the event store.

use std::path::PathBuf;

/// Errors that can occur when loading the event log.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The event log could not be read from disk.
    #[error("failed to read event log {}: {source}", path.display())]
    Io {
        /// Path of the event log.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The event log is not a JSON array of event objects.
    #[error("failed to parse event log {}: {source}", path.display())]
    Json {
        /// Path of the event log.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}
