//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&MySqlPool` as the first argument.

pub mod device_repo;
pub mod heartbeat_repo;
pub mod recording_repo;
pub mod voice_upload_repo;

pub use device_repo::DeviceRepo;
pub use heartbeat_repo::HeartbeatRepo;
pub use recording_repo::RecordingRepo;
pub use voice_upload_repo::VoiceUploadRepo;

/// Build a `LIKE` pattern matching `term` anywhere, lowercased.
///
/// `%`, `_` and the escape character itself are escaped so user input is
/// matched literally (MySQL's default `LIKE` escape is `\`).
pub(crate) fn contains_pattern(term: Option<&str>) -> String {
    let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        return "%".to_string();
    };
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn empty_term_matches_everything() {
        assert_eq!(contains_pattern(None), "%");
        assert_eq!(contains_pattern(Some("  ")), "%");
    }

    #[test]
    fn term_is_lowercased_and_wrapped() {
        assert_eq!(contains_pattern(Some("Reception")), "%reception%");
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(contains_pattern(Some("10_0%")), "%10\\_0\\%%");
    }
}
