//! Shared type definitions for the Pathlog query service.
//!
//! # Modules
//!
//! - [`event`] -- The event record, its typed header, and grid coordinates
//! - [`summary`] -- Summary payloads (grid bounds, path metrics)
//!
//! Dashboard-facing types are exported to `TypeScript` via `ts-rs`.

pub mod event;
pub mod summary;

// Re-export all public types at crate root for convenience.
pub use event::{
    CHOSEN_NODE, CONFLICT_CHECK, Coordinate, Endpoint, Event, EventHeader,
    PATH_CALCULATION_STARTED,
};
pub use summary::{GridBounds, PathMetrics};
