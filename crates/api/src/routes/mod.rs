pub mod devices;
pub mod health;
pub mod heartbeats;
pub mod recordings;
pub mod voice;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ping                                   liveness of the API itself
///
/// /heartbeats                             ingest (POST), list statuses (GET)
/// /heartbeats/summary                     bucket counts
/// /heartbeats/{device_id}                 one device's status
///
/// /devices                                list, create
/// /devices/{id}                           get, update, delete
///
/// /recordings                             paginated list
/// /recordings/{id}                        get
/// /recordings/{id}/stream                 playback descriptor
/// /recordings/{id}/download               download descriptor
/// /recordings/{id}/file                   media file
///
/// /voice                                  paginated upload list
/// /voice/upload                           multipart upload (POST)
/// /voice/{uuid}                           upload metadata
/// /voice/{uuid}/play                      stored audio
/// ```
pub fn api_routes(max_upload_bytes: u64) -> Router<AppState> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/heartbeats", heartbeats::router())
        .nest("/devices", devices::router())
        .nest("/recordings", recordings::router())
        .nest("/voice", voice::router(max_upload_bytes))
}
