//! Handlers for the `/recordings` resource.
//!
//! The catalog is read-only. Only `completed` recordings expose playback,
//! download and file access.

use axum::extract::{Path, Query, Request, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use setcrm_core::error::CoreError;
use setcrm_core::recording;
use setcrm_core::types::DbId;
use setcrm_db::models::recording::{RecordingFilter, RecordingHistory};

use crate::error::AppResult;
use crate::handlers::serve_file;
use crate::query::{parse_status, search_term, PagedFilterParams};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// Playback descriptor returned by `/stream`.
#[derive(Debug, Serialize)]
pub struct StreamInfo {
    pub stream_url: String,
    pub file_name: String,
    /// Minutes.
    pub duration: Option<i32>,
    pub content_type: &'static str,
}

/// Download descriptor returned by `/download`.
#[derive(Debug, Serialize)]
pub struct DownloadInfo {
    pub download_url: String,
    pub file_name: String,
    /// Bytes, when the media file is present on disk.
    pub file_size: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileParams {
    #[serde(default)]
    pub download: bool,
}

/// GET /api/recordings?page=&limit=&search=&status=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PagedFilterParams>,
) -> AppResult<Json<PaginatedResponse<RecordingHistory>>> {
    let page = params.page_request();
    let filter = RecordingFilter {
        search: search_term(params.search.as_deref()).map(str::to_string),
        status: parse_status(params.status.as_deref())?,
    };

    let (rows, total) = state
        .stores
        .recordings
        .search(&filter, page.limit, page.offset())
        .await?;
    Ok(Json(PaginatedResponse::new(rows, total, page)))
}

/// GET /api/recordings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RecordingHistory>>> {
    let recording = state
        .stores
        .recordings
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Recording", id))?;
    Ok(Json(DataResponse { data: recording }))
}

/// GET /api/recordings/{id}/stream
pub async fn stream(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<StreamInfo>>> {
    let recording = find_playable(&state, id).await?;
    Ok(Json(DataResponse {
        data: StreamInfo {
            stream_url: recording::stream_url(id),
            content_type: recording::media_content_type(&recording.file_name),
            file_name: recording.file_name,
            duration: recording.duration,
        },
    }))
}

/// GET /api/recordings/{id}/download
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DownloadInfo>>> {
    let recording = find_playable(&state, id).await?;

    let recordings_dir = &state.config.recordings_dir;
    let file_size = match recording::resolve_media_path(recordings_dir, &recording.file_name) {
        Ok(path) => tokio::fs::metadata(&path)
            .await
            .ok()
            .filter(|m| m.is_file())
            .map(|m| m.len()),
        Err(_) => None,
    };

    Ok(Json(DataResponse {
        data: DownloadInfo {
            download_url: recording::download_url(id),
            file_name: recording.file_name,
            file_size,
        },
    }))
}

/// GET /api/recordings/{id}/file?download=
pub async fn serve_media(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<FileParams>,
    request: Request,
) -> AppResult<Response> {
    let recording = find_playable(&state, id).await?;
    let path = recording::resolve_media_path(&state.config.recordings_dir, &recording.file_name)
        .map_err(|_| CoreError::not_found("Recording file", id))?;

    let attachment = params.download.then_some(recording.file_name.as_str());
    serve_file(&path, request, "Recording file", id, attachment).await
}

/// A recording that exists and has finished successfully.
async fn find_playable(state: &AppState, id: DbId) -> AppResult<RecordingHistory> {
    let recording = state
        .stores
        .recordings
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Recording", id))?;

    if !recording.status.is_playable() {
        tracing::debug!(recording_id = id, status = %recording.status, "Recording not playable");
        return Err(CoreError::not_found("Completed recording", id).into());
    }
    Ok(recording)
}
