//! REST API endpoint handlers for the query server.
//!
//! All handlers read the immutable [`EventStore`](pathlog_core::EventStore)
//! held by the shared [`AppState`]. List endpoints never reject a query:
//! malformed filter values simply match nothing.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/steps` | Filtered event list (`bot_id`, `timestamp`, `start`, `dest`) |
//! | `GET` | `/api/step/:id` | Single event by position |
//! | `GET` | `/api/bots` | Sorted distinct bot identifiers |
//! | `GET` | `/api/bounds` | Padded grid bounds of the filtered events |
//! | `GET` | `/api/metrics` | Path metrics of the filtered events |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use pathlog_core::{Criteria, StepQuery, query, summary};
use pathlog_types::Event;
use tracing::debug;

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing store size and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let event_count = state.store.len();
    let bot_count = summary::unique_bot_ids(&state.store).len();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Pathlog</title>
</head>
<body>
    <h1>Pathlog</h1>
    <p>Path calculation event log query server</p>

    <p>Events: {event_count}<br>Bots: {bot_count}</p>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/steps">/api/steps</a> -- Events (?bot_id=, ?timestamp=, ?start=x,y, ?dest=x,y)</li>
        <li><a href="/api/step/0">/api/step/:id</a> -- Single event by position</li>
        <li><a href="/api/bots">/api/bots</a> -- Bot identifiers</li>
        <li><a href="/api/bounds">/api/bounds</a> -- Grid bounds (same filters as /api/steps)</li>
        <li><a href="/api/metrics">/api/metrics</a> -- Path metrics (same filters as /api/steps)</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/steps -- filtered event list
// ---------------------------------------------------------------------------

/// List events matching every supplied filter, in store order.
///
/// # Query Parameters
///
/// - `bot_id`: exact bot identifier.
/// - `timestamp`: exact timestamp string.
/// - `start`: `x,y` source of a `path_calculation_started` event.
/// - `dest`: `x,y` destination of a `path_calculation_started` event.
pub async fn list_steps(
    State(state): State<Arc<AppState>>,
    params: Result<Query<StepQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ObserverError> {
    let events = filtered(&state, params);

    Ok(Json(serde_json::to_value(&events)?))
}

// ---------------------------------------------------------------------------
// GET /api/step/:id -- single event
// ---------------------------------------------------------------------------

/// Return the event at position `id`.
///
/// Anything other than an in-range non-negative integer is a 404 with
/// `{"error": "Step not found"}`, including a segment that does not decode.
pub async fn get_step(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ObserverError> {
    let Path(id) = id.map_err(|rejection| {
        debug!(error = %rejection, "Undecodable step id");
        ObserverError::step_not_found()
    })?;
    let event = query::get_by_index(&state.store, &id).ok_or_else(ObserverError::step_not_found)?;

    Ok(Json(event.raw().clone()))
}

// ---------------------------------------------------------------------------
// GET /api/bots -- bot identifiers
// ---------------------------------------------------------------------------

/// List the distinct bot identifiers present in the store.
pub async fn list_bots(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(summary::unique_bot_ids(&state.store))
}

// ---------------------------------------------------------------------------
// GET /api/bounds -- grid bounds
// ---------------------------------------------------------------------------

/// Return the padded grid bounds of the filtered events, or `null` when
/// none of them carries a coordinate.
pub async fn get_bounds(
    State(state): State<Arc<AppState>>,
    params: Result<Query<StepQuery>, QueryRejection>,
) -> impl IntoResponse {
    let events = filtered(&state, params);

    Json(summary::grid_bounds(events))
}

// ---------------------------------------------------------------------------
// GET /api/metrics -- path metrics
// ---------------------------------------------------------------------------

/// Return path-planning metrics of the filtered events.
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    params: Result<Query<StepQuery>, QueryRejection>,
) -> impl IntoResponse {
    let events = filtered(&state, params);

    Json(summary::path_metrics(events))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Apply the query-string filters to the store.
///
/// A query string that cannot be read at all (for example a repeated
/// `bot_id`) matches nothing instead of failing the request.
fn filtered(state: &AppState, params: Result<Query<StepQuery>, QueryRejection>) -> Vec<&Event> {
    match params {
        Ok(Query(params)) => {
            let criteria = Criteria::from_query(&params);
            let events = query::filter(&state.store, &criteria);
            debug!(?criteria, matches = events.len(), "Filtered steps");
            events
        }
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable query string, matching nothing");
            Vec::new()
        }
    }
}
