//! Repository for the `voice_upload` table.

use setcrm_core::types::DbId;
use sqlx::MySqlPool;

use super::contains_pattern;
use crate::models::voice_upload::{CreateVoiceUpload, VoiceUpload};

const COLUMNS: &str =
    "id, uuid, ip_address, cnic, start_time, end_time, file_name, file_path, file_size, created_on";

/// Persists voice upload metadata.
pub struct VoiceUploadRepo;

impl VoiceUploadRepo {
    /// Insert an upload record and return the stored row.
    pub async fn create(
        pool: &MySqlPool,
        input: &CreateVoiceUpload,
    ) -> Result<VoiceUpload, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO voice_upload \
                (uuid, ip_address, cnic, start_time, end_time, \
                 file_name, file_path, file_size, created_on) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.uuid)
        .bind(&input.ip_address)
        .bind(&input.cnic)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(&input.file_name)
        .bind(&input.file_path)
        .bind(input.file_size)
        .bind(input.created_on)
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as DbId;
        let query = format!("SELECT {COLUMNS} FROM voice_upload WHERE id = ?");
        sqlx::query_as::<_, VoiceUpload>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_uuid(
        pool: &MySqlPool,
        uuid: &str,
    ) -> Result<Option<VoiceUpload>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM voice_upload WHERE uuid = ?");
        sqlx::query_as::<_, VoiceUpload>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// One page of uploads whose CNIC contains `search`, newest first,
    /// together with the total number of matches.
    pub async fn search(
        pool: &MySqlPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<VoiceUpload>, i64), sqlx::Error> {
        let pattern = contains_pattern(search);

        let count_query = "SELECT COUNT(*) FROM voice_upload WHERE LOWER(cnic) LIKE ?";
        let (total,): (i64,) = sqlx::query_as(count_query)
            .bind(&pattern)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM voice_upload \
             WHERE LOWER(cnic) LIKE ? \
             ORDER BY created_on DESC, id DESC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, VoiceUpload>(&query)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }
}
