//! Query API server for the Pathlog event store.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for listing events with `bot_id`, `timestamp`,
//!   `start`, and `dest` filters and for fetching one event by position
//! - **Summary endpoints** for bot identifiers, grid bounds, and path
//!   metrics over the same filters
//! - **Minimal HTML status page** (`GET /`)
//!
//! # Architecture
//!
//! The server reads from an immutable [`EventStore`] loaded once before
//! the listener is bound. Every request is a synchronous in-memory scan,
//! so handlers share the store through an [`Arc`](std::sync::Arc) with
//! no locking.
//!
//! [`EventStore`]: pathlog_core::EventStore

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ObserverError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
