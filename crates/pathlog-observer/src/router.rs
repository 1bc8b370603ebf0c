//! Axum router construction for the query API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the query server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /api/steps` -- filtered event list
/// - `GET /api/step/:id` -- single event by position
/// - `GET /api/bots` -- bot identifiers
/// - `GET /api/bounds` -- grid bounds of the filtered events
/// - `GET /api/metrics` -- path metrics of the filtered events
///
/// CORS allows any origin; the API is read-only.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // REST API
        .route("/api/steps", get(handlers::list_steps))
        .route("/api/step/{id}", get(handlers::get_step))
        .route("/api/bots", get(handlers::list_bots))
        .route("/api/bounds", get(handlers::get_bounds))
        .route("/api/metrics", get(handlers::get_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
