//! Voice upload entity and insert DTO.

use serde::Serialize;
use setcrm_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Metadata of an uploaded audio file.
///
/// `file_name` is the name the client sent; `file_path` is where the bytes
/// were written on the server.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct VoiceUpload {
    pub id: DbId,
    pub uuid: String,
    pub ip_address: String,
    pub cnic: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub created_on: Timestamp,
}

/// DTO for inserting a voice upload record.
#[derive(Debug, Clone)]
pub struct CreateVoiceUpload {
    pub uuid: String,
    pub ip_address: String,
    pub cnic: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub created_on: Timestamp,
}
