//! Route definitions for the `/voice` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::voice;
use crate::state::AppState;

/// Room for multipart boundaries and the text fields on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Routes mounted at `/voice`.
///
/// ```text
/// GET    /                 -> list (?page=&limit=&search=)
/// POST   /upload           -> upload (multipart)
/// GET    /{uuid}           -> get_by_uuid
/// GET    /{uuid}/play      -> play
/// ```
pub fn router(max_upload_bytes: u64) -> Router<AppState> {
    let body_limit = max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);
    let upload = post(voice::upload).layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/", get(voice::list))
        .route("/upload", upload)
        .route("/{uuid}", get(voice::get_by_uuid))
        .route("/{uuid}/play", get(voice::play))
}
