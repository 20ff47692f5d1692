//! Repository for the `device_mapping` table.

use setcrm_core::types::DbId;
use sqlx::MySqlPool;

use super::contains_pattern;
use crate::models::device::{CreateDevice, DeviceMapping, UpdateDevice};

/// Column list for `device_mapping` queries.
const COLUMNS: &str = "id, ip_address, device_name, created_on";

/// Provides CRUD operations for registered devices.
pub struct DeviceRepo;

impl DeviceRepo {
    /// List devices whose IP or name contains `search` (case-insensitive), newest first.
    pub async fn list(
        pool: &MySqlPool,
        search: Option<&str>,
    ) -> Result<Vec<DeviceMapping>, sqlx::Error> {
        let pattern = contains_pattern(search);
        let query = format!(
            "SELECT {COLUMNS} FROM device_mapping \
             WHERE LOWER(ip_address) LIKE ? OR LOWER(device_name) LIKE ? \
             ORDER BY created_on DESC, id DESC"
        );
        sqlx::query_as::<_, DeviceMapping>(&query)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &MySqlPool,
        id: DbId,
    ) -> Result<Option<DeviceMapping>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM device_mapping WHERE id = ?");
        sqlx::query_as::<_, DeviceMapping>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_ip(
        pool: &MySqlPool,
        ip_address: &str,
    ) -> Result<Option<DeviceMapping>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM device_mapping WHERE ip_address = ?");
        sqlx::query_as::<_, DeviceMapping>(&query)
            .bind(ip_address)
            .fetch_optional(pool)
            .await
    }

    /// Insert a device and return the stored row.
    ///
    /// A duplicate IP violates `uq_device_mapping_ip_address`.
    pub async fn create(
        pool: &MySqlPool,
        input: &CreateDevice,
    ) -> Result<DeviceMapping, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO device_mapping (ip_address, device_name, created_on) \
             VALUES (?, ?, CURRENT_TIMESTAMP(3))",
        )
        .bind(&input.ip_address)
        .bind(&input.device_name)
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as DbId;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Update a device. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &MySqlPool,
        id: DbId,
        input: &UpdateDevice,
    ) -> Result<Option<DeviceMapping>, sqlx::Error> {
        sqlx::query(
            "UPDATE device_mapping SET \
                ip_address = COALESCE(?, ip_address), \
                device_name = COALESCE(?, device_name) \
             WHERE id = ?",
        )
        .bind(&input.ip_address)
        .bind(&input.device_name)
        .bind(id)
        .execute(pool)
        .await?;

        // rows_affected is 0 for unchanged values on MySQL; re-read instead.
        Self::find_by_id(pool, id).await
    }

    /// Delete a device. Returns `true` if a row was removed.
    pub async fn delete(pool: &MySqlPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM device_mapping WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
