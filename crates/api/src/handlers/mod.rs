pub mod devices;
pub mod heartbeats;
pub mod recordings;
pub mod voice;

use std::path::Path;

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::HeaderValue;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use setcrm_core::error::CoreError;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::AppResult;
use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct PingMessage {
    pub message: &'static str,
}

/// GET /api/ping
pub async fn ping() -> Json<DataResponse<PingMessage>> {
    Json(DataResponse {
        data: PingMessage { message: "pong" },
    })
}

/// Serve a file from disk, honouring `Range` and conditional headers.
///
/// Answers 404 (as `entity` / `id`) when the file is missing. When
/// `attachment` is set the response asks the browser to save it under that name.
pub(crate) async fn serve_file(
    path: &Path,
    request: Request,
    entity: &'static str,
    id: impl ToString,
    attachment: Option<&str>,
) -> AppResult<Response> {
    let is_file = tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        tracing::warn!(path = %path.display(), "Media file missing on disk");
        return Err(CoreError::not_found(entity, id).into());
    }

    let response = ServeFile::new(path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});
    let mut response = response.map(Body::new);

    if let Some(name) = attachment {
        if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{name}\"")) {
            response.headers_mut().insert(CONTENT_DISPOSITION, value);
        }
    }
    Ok(response)
}
