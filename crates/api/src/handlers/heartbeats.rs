//! Handlers for the `/heartbeats` resource.
//!
//! Ingestion appends one observation per ping. Reads take a snapshot from
//! the store and derive liveness at the current instant, so a device moves
//! between buckets without any further writes.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use setcrm_core::error::CoreError;
use setcrm_core::heartbeat::HeartbeatPing;
use setcrm_core::liveness::{
    list_statuses_with, DeviceLivenessStatus, LivenessStatus, LivenessSummary,
};
use setcrm_core::types::Timestamp;

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::query::{parse_status, search_term, FilterParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Acknowledgement for an ingested heartbeat.
#[derive(Debug, Serialize)]
pub struct HeartbeatAck {
    pub success: bool,
    pub message: &'static str,
    pub device_id: String,
    pub network_address: String,
    pub observed_at: Timestamp,
}

/// POST /api/heartbeats
pub async fn ingest(
    State(state): State<AppState>,
    JsonBody(ping): JsonBody<HeartbeatPing>,
) -> AppResult<Json<DataResponse<HeartbeatAck>>> {
    let observation = ping.into_observation(Utc::now())?;
    state.stores.heartbeats.insert(observation.clone()).await?;

    tracing::debug!(
        device_id = %observation.device_id,
        network_address = %observation.network_address,
        "Heartbeat recorded"
    );

    Ok(Json(DataResponse {
        data: HeartbeatAck {
            success: true,
            message: "Heartbeat recorded",
            device_id: observation.device_id,
            network_address: observation.network_address,
            observed_at: observation.observed_at,
        },
    }))
}

/// GET /api/heartbeats?status=&search=
pub async fn list_statuses(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> AppResult<Json<DataResponse<Vec<DeviceLivenessStatus>>>> {
    let status: Option<LivenessStatus> = parse_status(params.status.as_deref())?;
    let search = search_term(params.search.as_deref()).map(str::to_lowercase);

    let statuses = current_statuses(&state)
        .await?
        .into_iter()
        .filter(|s| status.is_none() || status == Some(s.status))
        .filter(|s| {
            search.as_deref().map_or(true, |term| {
                s.device_id.to_lowercase().contains(term)
                    || s.network_address.to_lowercase().contains(term)
            })
        })
        .collect();

    Ok(Json(DataResponse { data: statuses }))
}

/// GET /api/heartbeats/summary
pub async fn summary(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<LivenessSummary>>> {
    let statuses = current_statuses(&state).await?;
    Ok(Json(DataResponse {
        data: LivenessSummary::from_statuses(&statuses),
    }))
}

/// GET /api/heartbeats/{device_id}
///
/// Not reachable for the device id `summary`; see [`crate::routes::heartbeats`].
pub async fn get_status(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> AppResult<Json<DataResponse<DeviceLivenessStatus>>> {
    let status = current_statuses(&state)
        .await?
        .into_iter()
        .find(|s| s.device_id == device_id)
        .ok_or_else(|| CoreError::not_found("Device", &device_id))?;
    Ok(Json(DataResponse { data: status }))
}

/// Per-device liveness right now, using the configured thresholds.
async fn current_statuses(state: &AppState) -> AppResult<Vec<DeviceLivenessStatus>> {
    let snapshot = state.stores.heartbeats.latest_snapshot().await?;
    let thresholds = &state.config.liveness;
    Ok(list_statuses_with(&snapshot, Utc::now(), thresholds))
}
