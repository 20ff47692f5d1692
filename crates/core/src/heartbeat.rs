//! Heartbeat observations and the ingestion request.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::validation;

/// One liveness ping from a device. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatObservation {
    pub device_id: String,
    pub network_address: String,
    pub observed_at: Timestamp,
}

/// Body of `POST /heartbeats`.
///
/// Devices already in the field send `uuid` / `ip_address`; both spellings
/// are accepted. Absent and `null` fields deserialize as empty strings so
/// they are reported by validation rather than by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct HeartbeatPing {
    #[serde(
        default,
        alias = "uuid",
        deserialize_with = "validation::null_as_empty"
    )]
    #[validate(
        custom(function = "validation::not_blank"),
        length(max = 64, message = "device_id must not exceed 64 characters")
    )]
    pub device_id: String,

    #[serde(
        default,
        alias = "ip_address",
        deserialize_with = "validation::null_as_empty"
    )]
    #[validate(
        custom(function = "validation::not_blank"),
        length(max = 45, message = "network_address must not exceed 45 characters")
    )]
    pub network_address: String,
}

impl HeartbeatPing {
    /// Validate the ping and stamp it with the time it was received.
    pub fn into_observation(
        self,
        observed_at: Timestamp,
    ) -> Result<HeartbeatObservation, CoreError> {
        validation::validate(&self)?;
        Ok(HeartbeatObservation {
            device_id: self.device_id.trim().to_string(),
            network_address: self.network_address.trim().to_string(),
            observed_at,
        })
    }
}
