//! Repository for the `recording_history` table.

use setcrm_core::types::DbId;
use sqlx::MySqlPool;

use super::contains_pattern;
use crate::models::recording::{RecordingFilter, RecordingHistory};

const COLUMNS: &str =
    "id, cnic, start_time, end_time, file_name, created_on, ip_address, duration, status";

/// `WHERE` clause shared by the page and count queries.
/// Binds: CNIC pattern, status, status.
const FILTER: &str = "WHERE LOWER(cnic) LIKE ? AND (? IS NULL OR status = ?)";

/// Read access to the recording catalog.
pub struct RecordingRepo;

impl RecordingRepo {
    /// One page of recordings matching `filter`, newest `start_time` first,
    /// together with the total number of matches.
    pub async fn search(
        pool: &MySqlPool,
        filter: &RecordingFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<RecordingHistory>, i64), sqlx::Error> {
        let pattern = contains_pattern(filter.search.as_deref());
        let status = filter.status.map(|s| s.as_str());

        let count_query = format!("SELECT COUNT(*) FROM recording_history {FILTER}");
        let (total,): (i64,) = sqlx::query_as(&count_query)
            .bind(&pattern)
            .bind(status)
            .bind(status)
            .fetch_one(pool)
            .await?;

        let page_query = format!(
            "SELECT {COLUMNS} FROM recording_history {FILTER} \
             ORDER BY start_time DESC, id DESC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, RecordingHistory>(&page_query)
            .bind(&pattern)
            .bind(status)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }

    pub async fn find_by_id(
        pool: &MySqlPool,
        id: DbId,
    ) -> Result<Option<RecordingHistory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recording_history WHERE id = ?");
        sqlx::query_as::<_, RecordingHistory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
