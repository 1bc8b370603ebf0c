//! Read-only summaries derived from a set of events.
//!
//! These are the payloads of the `/api/bounds` and `/api/metrics`
//! endpoints and are exported to `TypeScript` for the dashboard.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Padded bounding box of every coordinate referenced by a set of events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GridBounds {
    /// Smallest column, padded and clamped at zero.
    #[ts(type = "number")]
    pub min_x: i64,
    /// Smallest row, padded and clamped at zero.
    #[ts(type = "number")]
    pub min_y: i64,
    /// Largest column, padded.
    #[ts(type = "number")]
    pub max_x: i64,
    /// Largest row, padded.
    #[ts(type = "number")]
    pub max_y: i64,
}

/// Path-planning metrics over a set of events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PathMetrics {
    /// Number of events considered.
    pub events_total: usize,
    /// Number of events per event tag.
    pub event_counts: BTreeMap<String, usize>,
    /// Milliseconds between the earliest and latest timestamp.
    #[ts(type = "number | null")]
    pub time_taken_ms: Option<i64>,
    /// Number of chosen nodes with a coordinate.
    pub path_length: usize,
    /// Manhattan distance along the chosen nodes.
    #[ts(type = "number")]
    pub path_distance: u64,
    /// Number of conflict checks that found a conflict.
    pub conflicts_detected: usize,
}
