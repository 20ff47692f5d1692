//! Handlers for the `/voice` resource.
//!
//! Uploads arrive as multipart forms. The whole form is read and validated
//! before anything touches the disk, so a rejected upload leaves no file.

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use setcrm_core::error::CoreError;
use setcrm_core::upload::{self, VoiceUploadFields};
use setcrm_db::models::voice_upload::{CreateVoiceUpload, VoiceUpload};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::serve_file;
use crate::query::{search_term, PaginationParams, SearchParams};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// Response body for a stored upload.
#[derive(Debug, Serialize)]
pub struct UploadReceipt {
    pub success: bool,
    pub uuid: String,
    pub file_path: String,
    pub playback_url: String,
}

/// POST /api/voice/upload
///
/// Text fields `ip_address`, `cnic`, `start_time`, `end_time` and a file
/// field `mp3` (or `file`). Unknown fields are ignored.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadReceipt>)> {
    let mut fields = VoiceUploadFields::default();
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "mp3" | "file" => {
                fields.file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type();
                fields.content_type = content_type.map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                fields.file_size = Some(bytes.len() as u64);
                data = Some(bytes);
            }
            "ip_address" => fields.ip_address = Some(field.text().await.map_err(multipart_error)?),
            "cnic" => fields.cnic = Some(field.text().await.map_err(multipart_error)?),
            "start_time" => fields.start_time = Some(field.text().await.map_err(multipart_error)?),
            "end_time" => fields.end_time = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let upload = fields.validate(state.config.max_upload_bytes)?;
    let data = data.ok_or_else(|| {
        AppError::InternalError("validated upload without file data".into())
    })?;

    let uuid = Uuid::new_v4();
    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| {
            AppError::InternalError(format!("Failed to create upload directory: {e}"))
        })?;

    let file_path = upload_dir.join(upload::stored_file_name(uuid, upload.extension));
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| {
            AppError::InternalError(format!("Failed to write upload: {e}"))
        })?;
    let file_path = file_path.to_string_lossy().into_owned();

    let record = CreateVoiceUpload {
        uuid: uuid.to_string(),
        ip_address: upload.ip_address,
        cnic: upload.cnic,
        start_time: upload.start_time,
        end_time: upload.end_time,
        file_name: upload.original_file_name,
        file_path: file_path.clone(),
        file_size: upload.file_size as i64,
        created_on: Utc::now(),
    };

    if let Err(e) = state.stores.voice_uploads.create(&record).await {
        // The file is orphaned without its record.
        if let Err(remove_err) = tokio::fs::remove_file(&file_path).await {
            tracing::warn!(
                path = %file_path,
                error = %remove_err,
                "Failed to remove orphaned upload"
            );
        }
        return Err(e.into());
    }

    tracing::info!(
        uuid = %uuid,
        cnic = %record.cnic,
        file_size = record.file_size,
        "Voice upload stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadReceipt {
            success: true,
            uuid: uuid.to_string(),
            file_path,
            playback_url: upload::playback_url(uuid),
        }),
    ))
}

/// GET /api/voice?page=&limit=&search=
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<PaginatedResponse<VoiceUpload>>> {
    let page = pagination.page_request();
    let search = search_term(params.search.as_deref());
    let (rows, total) = state
        .stores
        .voice_uploads
        .search(search, page.limit, page.offset())
        .await?;
    Ok(Json(PaginatedResponse::new(rows, total, page)))
}

/// GET /api/voice/{uuid}
pub async fn get_by_uuid(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> AppResult<Json<DataResponse<VoiceUpload>>> {
    let upload = find_upload(&state, &uuid).await?;
    Ok(Json(DataResponse { data: upload }))
}

/// GET /api/voice/{uuid}/play
pub async fn play(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    request: Request,
) -> AppResult<Response> {
    let upload = find_upload(&state, &uuid).await?;
    let path = std::path::Path::new(&upload.file_path);
    serve_file(path, request, "Voice upload file", &uuid, None).await
}

async fn find_upload(state: &AppState, uuid: &str) -> AppResult<VoiceUpload> {
    state
        .stores
        .voice_uploads
        .find_by_uuid(uuid)
        .await?
        .ok_or_else(|| CoreError::not_found("Voice upload", uuid).into())
}

/// Map a multipart failure, keeping the 413 the body limit produces.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
