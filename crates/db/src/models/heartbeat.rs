//! Row mapping for the `recording_heartbeat` table.

use setcrm_core::heartbeat::HeartbeatObservation;
use setcrm_core::types::Timestamp;
use sqlx::FromRow;

/// A `recording_heartbeat` row. The table keeps the device's legacy column
/// names (`uuid`, `ip_address`, `created_on`).
#[derive(Debug, Clone, FromRow)]
pub struct HeartbeatRow {
    pub uuid: String,
    pub ip_address: String,
    pub created_on: Timestamp,
}

impl From<HeartbeatRow> for HeartbeatObservation {
    fn from(row: HeartbeatRow) -> Self {
        HeartbeatObservation {
            device_id: row.uuid,
            network_address: row.ip_address,
            observed_at: row.created_on,
        }
    }
}
