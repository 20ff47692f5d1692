//! Voice upload rules: required fields, audio allow-list, size ceiling,
//! and the recording time window.
//!
//! The HTTP layer collects raw multipart fields into [`VoiceUploadFields`];
//! [`VoiceUploadFields::validate`] turns them into a [`ValidatedVoiceUpload`]
//! or a single [`CoreError::Validation`] describing what is wrong.

use chrono::{NaiveDateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::validation::validate_ip_address;

/// Default upload ceiling: 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Accepted audio file extensions (lowercase).
pub const ALLOWED_AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav"];

/// Accepted audio MIME types, mapped to the extension the file is stored under.
const ALLOWED_AUDIO_CONTENT_TYPES: &[(&str, &str)] = &[
    ("audio/mp3", "mp3"),
    ("audio/mpeg", "mp3"),
    ("audio/wav", "wav"),
    ("audio/x-wav", "wav"),
    ("audio/wave", "wav"),
];

/// Formats accepted for `start_time` / `end_time` besides RFC 3339.
/// These are what an HTML `datetime-local` input submits; they are read as UTC.
const LOCAL_DATETIME_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Pick the stored extension for an uploaded audio file.
///
/// The file name's extension wins when it is on the allow-list; otherwise a
/// recognised audio content type decides.
pub fn audio_extension(
    file_name: &str,
    content_type: Option<&str>,
) -> Result<&'static str, CoreError> {
    if let Some((_, ext)) = file_name.rsplit_once('.') {
        let ext = ext.to_ascii_lowercase();
        if let Some(allowed) = ALLOWED_AUDIO_EXTENSIONS.iter().find(|a| **a == ext) {
            return Ok(*allowed);
        }
    }

    if let Some(ct) = content_type {
        let ct = ct.trim().to_ascii_lowercase();
        for (mime, ext) in ALLOWED_AUDIO_CONTENT_TYPES {
            if *mime == ct {
                return Ok(ext);
            }
        }
    }

    Err(CoreError::Validation(
        "Only MP3 and WAV files are allowed".to_string(),
    ))
}

/// Reject empty files and files above `max_bytes`.
pub fn validate_file_size(size: u64, max_bytes: u64) -> Result<(), CoreError> {
    if size == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".to_string()));
    }
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "Uploaded file is {size} bytes; the limit is {max_bytes} bytes"
        )));
    }
    Ok(())
}

/// Parse an upload timestamp (RFC 3339, or a zone-less local form read as UTC).
pub fn parse_upload_time(field: &str, value: &str) -> Result<Timestamp, CoreError> {
    let value = value.trim();
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "{field} must be an RFC 3339 timestamp or YYYY-MM-DDTHH:MM"
            ))
        })
}

/// The window must be non-empty: `start < end`.
pub fn validate_time_window(start: Timestamp, end: Timestamp) -> Result<(), CoreError> {
    if start >= end {
        return Err(CoreError::Validation(
            "start_time must be before end_time".to_string(),
        ));
    }
    Ok(())
}

/// On-disk name for an upload.
pub fn stored_file_name(uuid: Uuid, extension: &str) -> String {
    format!("{uuid}.{extension}")
}

/// Public URL the dashboard uses to play an upload back.
pub fn playback_url(uuid: Uuid) -> String {
    format!("/api/voice/{uuid}/play")
}

// ---------------------------------------------------------------------------
// Form assembly
// ---------------------------------------------------------------------------

/// Raw multipart fields as received. The file body itself stays with the
/// caller; only its metadata is needed for validation.
#[derive(Debug, Clone, Default)]
pub struct VoiceUploadFields {
    pub ip_address: Option<String>,
    pub cnic: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub file_size: Option<u64>,
}

/// A voice upload that passed every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedVoiceUpload {
    pub ip_address: String,
    pub cnic: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub original_file_name: String,
    pub extension: &'static str,
    pub file_size: u64,
}

impl VoiceUploadFields {
    /// Apply all upload rules. Missing fields are reported together, in
    /// form order, before any format checks run.
    pub fn validate(self, max_bytes: u64) -> Result<ValidatedVoiceUpload, CoreError> {
        let ip_address = present(self.ip_address);
        let cnic = present(self.cnic);
        let start_time = present(self.start_time);
        let end_time = present(self.end_time);
        let file_name = present(self.file_name);

        let missing: Vec<&str> = [
            ("ip_address", ip_address.is_none()),
            ("cnic", cnic.is_none()),
            ("start_time", start_time.is_none()),
            ("end_time", end_time.is_none()),
            ("mp3", file_name.is_none() || self.file_size.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, is_missing)| is_missing.then_some(name))
        .collect();

        let (
            Some(ip_address),
            Some(cnic),
            Some(start_time),
            Some(end_time),
            Some(file_name),
            Some(file_size),
        ) = (ip_address, cnic, start_time, end_time, file_name, self.file_size)
        else {
            return Err(CoreError::Validation(format!(
                "All fields are required. Missing: {}",
                missing.join(", ")
            )));
        };

        validate_ip_address("ip_address", &ip_address)?;
        let start_time = parse_upload_time("start_time", &start_time)?;
        let end_time = parse_upload_time("end_time", &end_time)?;
        validate_time_window(start_time, end_time)?;
        let extension = audio_extension(&file_name, self.content_type.as_deref())?;
        validate_file_size(file_size, max_bytes)?;

        Ok(ValidatedVoiceUpload {
            ip_address,
            cnic,
            start_time,
            end_time,
            original_file_name: file_name,
            extension,
            file_size,
        })
    }
}

/// Trim a field and drop it when blank.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
