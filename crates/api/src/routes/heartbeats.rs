//! Route definitions for the `/heartbeats` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::heartbeats;
use crate::state::AppState;

/// Routes mounted at `/heartbeats`.
///
/// ```text
/// GET    /                 -> list_statuses (?status=&search=)
/// POST   /                 -> ingest
/// GET    /summary          -> summary
/// GET    /{device_id}      -> get_status
/// ```
///
/// The static `/summary` segment wins over `/{device_id}`, so a device that
/// reports the id `summary` is only reachable through the list endpoint
/// (`?search=summary`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(heartbeats::list_statuses).post(heartbeats::ingest))
        .route("/summary", get(heartbeats::summary))
        .route("/{device_id}", get(heartbeats::get_status))
}
