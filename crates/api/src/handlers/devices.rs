//! Handlers for the `/devices` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use setcrm_core::error::CoreError;
use setcrm_core::types::DbId;
use setcrm_core::validation::validate;
use setcrm_db::models::device::{CreateDevice, DeviceMapping, UpdateDevice};

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::query::{search_term, SearchParams};
use crate::response::{DataResponse, SuccessMessage};
use crate::state::AppState;

/// GET /api/devices?search=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<DeviceMapping>>>> {
    let search = search_term(params.search.as_deref());
    let devices = state.stores.devices.list(search).await?;
    Ok(Json(DataResponse { data: devices }))
}

/// GET /api/devices/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeviceMapping>>> {
    let device = state
        .stores
        .devices
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Device", id))?;
    Ok(Json(DataResponse { data: device }))
}

/// POST /api/devices
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateDevice>,
) -> AppResult<(StatusCode, Json<DataResponse<DeviceMapping>>)> {
    let input = input.trimmed();
    validate(&input)?;

    let device = state.stores.devices.create(&input).await?;
    tracing::info!(device_id = device.id, ip_address = %device.ip_address, "Device registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: device })))
}

/// PUT /api/devices/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateDevice>,
) -> AppResult<Json<DataResponse<DeviceMapping>>> {
    let input = input.trimmed();
    validate(&input)?;

    let device = state
        .stores
        .devices
        .update(id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Device", id))?;
    Ok(Json(DataResponse { data: device }))
}

/// DELETE /api/devices/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SuccessMessage>>> {
    if !state.stores.devices.delete(id).await? {
        return Err(CoreError::not_found("Device", id).into());
    }
    tracing::info!(device_id = id, "Device deleted");
    Ok(Json(DataResponse {
        data: SuccessMessage::new("Device deleted successfully"),
    }))
}
