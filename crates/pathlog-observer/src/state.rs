//! Shared application state for the query API.
//!
//! [`AppState`] owns the [`EventStore`]. The store is fully built before
//! the router exists and is never mutated, so handlers read it through the
//! shared [`Arc`](std::sync::Arc) without any lock.

use pathlog_core::EventStore;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// The loaded events.
    pub store: EventStore,
}

impl AppState {
    /// Create application state serving `store`.
    pub const fn new(store: EventStore) -> Self {
        Self { store }
    }
}
