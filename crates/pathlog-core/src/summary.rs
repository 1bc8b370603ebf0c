//! Read-only summaries over a set of events.
//!
//! Every function accepts any iterator of event references, so callers can
//! summarize the whole store or the output of [`crate::query::filter`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use pathlog_types::{CHOSEN_NODE, CONFLICT_CHECK, Coordinate, Event, GridBounds, PathMetrics};

/// Cells of padding added around the coordinate bounding box.
pub const GRID_PADDING: i64 = 5;

/// Timestamp layout written by the upstream log producer.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Distinct non-empty bot identifiers, sorted ascending.
pub fn unique_bot_ids<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<String> {
    events
        .into_iter()
        .filter_map(Event::bot_id)
        .filter(|id| !id.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Padded bounding box of every coordinate the events reference.
///
/// Returns `None` when no event carries a coordinate.
pub fn grid_bounds<'a>(events: impl IntoIterator<Item = &'a Event>) -> Option<GridBounds> {
    let mut coords = events.into_iter().flat_map(Event::coordinates);
    let first = coords.next()?;
    let (min, max) = coords.fold((first, first), |(min, max), c| {
        (
            Coordinate::new(min.x.min(c.x), min.y.min(c.y)),
            Coordinate::new(max.x.max(c.x), max.y.max(c.y)),
        )
    });

    Some(GridBounds {
        min_x: min.x.saturating_sub(GRID_PADDING).max(0),
        min_y: min.y.saturating_sub(GRID_PADDING).max(0),
        max_x: max.x.saturating_add(GRID_PADDING),
        max_y: max.y.saturating_add(GRID_PADDING),
    })
}

/// Path-planning metrics over the events, taken in iteration order.
pub fn path_metrics<'a>(events: impl IntoIterator<Item = &'a Event>) -> PathMetrics {
    let mut metrics = PathMetrics::default();
    let mut earliest: Option<&str> = None;
    let mut latest: Option<&str> = None;
    let mut previous: Option<Coordinate> = None;

    for event in events {
        metrics.events_total = metrics.events_total.saturating_add(1);

        if let Some(kind) = event.kind() {
            let count = metrics.event_counts.entry(kind.to_owned()).or_insert(0);
            *count = count.saturating_add(1);
        }

        if let Some(ts) = event.timestamp() {
            earliest = Some(earliest.map_or(ts, |e| e.min(ts)));
            latest = Some(latest.map_or(ts, |l| l.max(ts)));
        }

        match event.kind() {
            Some(CHOSEN_NODE) => {
                if let Some(coord) = event.header().coordinate {
                    metrics.path_length = metrics.path_length.saturating_add(1);
                    if let Some(prev) = previous {
                        metrics.path_distance =
                            metrics.path_distance.saturating_add(prev.manhattan(&coord));
                    }
                    previous = Some(coord);
                }
            }
            Some(CONFLICT_CHECK) if event.header().conflict_found == Some(true) => {
                metrics.conflicts_detected = metrics.conflicts_detected.saturating_add(1);
            }
            _ => {}
        }
    }

    metrics.time_taken_ms = earliest.zip(latest).and_then(|(start, end)| elapsed_ms(start, end));
    metrics
}

/// Milliseconds from `start` to `end`, or `None` if either does not parse.
fn elapsed_ms(start: &str, end: &str) -> Option<i64> {
    let start = NaiveDateTime::parse_from_str(start, TIMESTAMP_FORMAT).ok()?;
    let end = NaiveDateTime::parse_from_str(end, TIMESTAMP_FORMAT).ok()?;
    Some(end.signed_duration_since(start).num_milliseconds())
}

/// Count events per tag, mostly useful for logging a loaded store.
pub fn event_counts<'a>(events: impl IntoIterator<Item = &'a Event>) -> BTreeMap<String, usize> {
    path_metrics(events).event_counts
}
