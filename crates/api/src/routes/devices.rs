//! Route definitions for the `/devices` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::devices;
use crate::state::AppState;

/// Routes mounted at `/devices`.
///
/// ```text
/// GET    /        -> list (?search=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(devices::list).post(devices::create))
        .route(
            "/{id}",
            get(devices::get_by_id).put(devices::update).delete(devices::delete),
        )
}
