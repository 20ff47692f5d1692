//! Recording catalog entity and search filter.

use serde::Serialize;
use setcrm_core::recording::RecordingStatus;
use setcrm_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A recording session captured by a device.
///
/// `duration` is in minutes and stays `None` until the recording ends.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct RecordingHistory {
    pub id: DbId,
    pub cnic: String,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub file_name: String,
    pub created_on: Timestamp,
    pub ip_address: String,
    pub duration: Option<i32>,
    #[sqlx(try_from = "String")]
    pub status: RecordingStatus,
}

/// Optional filters for recording searches.
#[derive(Debug, Clone, Default)]
pub struct RecordingFilter {
    /// Substring of the CNIC.
    pub search: Option<String>,
    pub status: Option<RecordingStatus>,
}
