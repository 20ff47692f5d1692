//! Repository for the append-only `recording_heartbeat` table.

use setcrm_core::heartbeat::HeartbeatObservation;
use setcrm_core::types::Timestamp;
use sqlx::MySqlPool;

use crate::models::heartbeat::HeartbeatRow;

/// Heartbeat inserts and liveness snapshots.
pub struct HeartbeatRepo;

impl HeartbeatRepo {
    /// Record one observation.
    pub async fn insert(
        pool: &MySqlPool,
        observation: &HeartbeatObservation,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO recording_heartbeat (uuid, ip_address, created_on) VALUES (?, ?, ?)",
        )
        .bind(&observation.device_id)
        .bind(&observation.network_address)
        .bind(observation.observed_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// The newest observation(s) per device, oldest first by insertion.
    ///
    /// Rows sharing a device's maximum `created_on` are all returned; the
    /// aggregator resolves that tie to the last one, i.e. the highest `id`.
    pub async fn latest_per_device(
        pool: &MySqlPool,
    ) -> Result<Vec<HeartbeatObservation>, sqlx::Error> {
        let rows = sqlx::query_as::<_, HeartbeatRow>(
            "SELECT h.uuid, h.ip_address, h.created_on \
             FROM recording_heartbeat h \
             JOIN ( \
                 SELECT uuid, MAX(created_on) AS created_on \
                 FROM recording_heartbeat \
                 GROUP BY uuid \
             ) latest ON latest.uuid = h.uuid AND latest.created_on = h.created_on \
             ORDER BY h.created_on ASC, h.id ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(HeartbeatObservation::from).collect())
    }

    /// Delete observations recorded before `cutoff`. Returns the number of rows removed.
    pub async fn delete_older_than(
        pool: &MySqlPool,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recording_heartbeat WHERE created_on < ?")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
