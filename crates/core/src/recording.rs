//! Recording lifecycle status and media file helpers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Lifecycle of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingStatus {
    Completed,
    InProgress,
    Failed,
}

impl RecordingStatus {
    pub const ALL: [RecordingStatus; 3] = [
        RecordingStatus::Completed,
        RecordingStatus::InProgress,
        RecordingStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordingStatus::Completed => "completed",
            RecordingStatus::InProgress => "in_progress",
            RecordingStatus::Failed => "failed",
        }
    }

    /// Only finished recordings have a complete media file to hand out.
    pub fn is_playable(self) -> bool {
        self == RecordingStatus::Completed
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RecordingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown recording status '{wanted}'. Expected one of: completed, in_progress, failed"
                ))
            })
    }
}

impl TryFrom<String> for RecordingStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// MIME type for a media file, chosen by extension.
pub fn media_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        _ => "application/octet-stream",
    }
}

/// Resolve a stored file name inside `root`.
///
/// File names come from the database, so anything that could escape the
/// media directory (separators, `..`, absolute paths) is rejected.
pub fn resolve_media_path(root: &Path, file_name: &str) -> Result<PathBuf, CoreError> {
    let is_plain_name = !file_name.is_empty()
        && file_name != "."
        && file_name != ".."
        && !file_name.contains(['/', '\\'])
        && !file_name.contains("..");
    if !is_plain_name {
        return Err(CoreError::Validation(format!(
            "Invalid media file name '{file_name}'"
        )));
    }
    Ok(root.join(file_name))
}

/// URL the player streams the media from.
pub fn stream_url(id: DbId) -> String {
    format!("/api/recordings/{id}/file")
}

/// Same media, served as an attachment.
pub fn download_url(id: DbId) -> String {
    format!("/api/recordings/{id}/file?download=true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn status_round_trips_through_text() {
        for status in RecordingStatus::ALL {
            assert_eq!(status.as_str().parse::<RecordingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_try_from_rejects_unknown() {
        assert_matches!(
            RecordingStatus::try_from("paused".to_string()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn only_completed_is_playable() {
        assert!(RecordingStatus::Completed.is_playable());
        assert!(!RecordingStatus::InProgress.is_playable());
        assert!(!RecordingStatus::Failed.is_playable());
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(
            media_content_type("recording_20240115_093000.mp4"),
            "video/mp4"
        );
        assert_eq!(media_content_type("VOICE.WAV"), "audio/wav");
        assert_eq!(media_content_type("clip.mp3"), "audio/mpeg");
        assert_eq!(
            media_content_type("no_extension"),
            "application/octet-stream"
        );
    }

    #[test]
    fn resolve_media_path_joins_plain_names() {
        let path = resolve_media_path(Path::new("/srv/media"), "rec.mp4").unwrap();
        assert_eq!(path, PathBuf::from("/srv/media/rec.mp4"));
    }

    #[test]
    fn resolve_media_path_rejects_traversal() {
        let root = Path::new("/srv/media");
        for name in ["../etc/passwd", "a/b.mp4", "..", "", "c:\\x.mp4", "x..mp4"] {
            assert_matches!(
                resolve_media_path(root, name),
                Err(CoreError::Validation(_)),
                "{name}"
            );
        }
    }

    #[test]
    fn urls_embed_the_id() {
        assert_eq!(stream_url(7), "/api/recordings/7/file");
        assert_eq!(download_url(7), "/api/recordings/7/file?download=true");
    }
}
