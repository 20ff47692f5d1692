//! Route definitions for the `/recordings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::recordings;
use crate::state::AppState;

/// Routes mounted at `/recordings`.
///
/// ```text
/// GET    /                 -> list (?page=&limit=&search=&status=)
/// GET    /{id}             -> get_by_id
/// GET    /{id}/stream      -> stream
/// GET    /{id}/download    -> download
/// GET    /{id}/file        -> serve_media
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(recordings::list))
        .route("/{id}", get(recordings::get_by_id))
        .route("/{id}/stream", get(recordings::stream))
        .route("/{id}/download", get(recordings::download))
        .route("/{id}/file", get(recordings::serve_media))
}
