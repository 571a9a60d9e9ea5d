use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::warn;

/// Token the external recorder writes to the status file while capturing.
///
/// Matching is exact and case-sensitive after trimming surrounding
/// whitespace; any other content reads as not-recording.
pub const RECORDING_TOKEN: &str = "recording";

/// Recorder state as observed through the shared status file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordingState {
    /// Recorder is not capturing (or its state is unobservable)
    Idle,
    /// Recorder reports an active capture
    Recording,
    /// Status file held content this crate does not recognize
    Unknown,
}

impl RecordingState {
    /// Parses a raw status-file token (pure, testable)
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            RECORDING_TOKEN => Self::Recording,
            "idle" => Self::Idle,
            _ => Self::Unknown,
        }
    }

    /// Collapses `Unknown` into the fail-safe `Idle` default
    ///
    /// The display layer must never show a stuck "active" indicator, so
    /// everything that is not a positive `recording` signal reads as `Idle`.
    #[must_use]
    pub const fn normalized(self) -> Self {
        match self {
            Self::Recording => Self::Recording,
            Self::Idle | Self::Unknown => Self::Idle,
        }
    }
}

/// Read-only observer of the recorder's status file.
///
/// The file is written by the external recorder process with no locking;
/// reads here are best-effort and non-atomic with respect to that writer.
#[derive(Debug, Clone)]
pub struct StatusObserver {
    status_path: PathBuf,
}

impl StatusObserver {
    /// Creates an observer for the given status-file path
    pub fn new(status_path: impl Into<PathBuf>) -> Self {
        Self {
            status_path: status_path.into(),
        }
    }

    /// Current recorder state.
    ///
    /// Total operation: a missing file, an unreadable file, non-UTF-8
    /// content, and unrecognized tokens all degrade to [`RecordingState::Idle`].
    /// Never returns an error and never blocks beyond one bounded local read.
    #[must_use]
    pub fn query(&self) -> RecordingState {
        match fs::read_to_string(&self.status_path) {
            Ok(contents) => RecordingState::from_token(&contents).normalized(),
            // Pre-start the file simply does not exist yet
            Err(e) if e.kind() == io::ErrorKind::NotFound => RecordingState::Idle,
            Err(e) => {
                warn!(
                    path = %self.status_path.display(),
                    "failed to read status file: {}",
                    e
                );
                RecordingState::Idle
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_token_exact_literal() {
        assert_eq!(
            RecordingState::from_token("recording"),
            RecordingState::Recording
        );
        assert_eq!(RecordingState::from_token("idle"), RecordingState::Idle);
    }

    #[test]
    fn test_from_token_trims_whitespace() {
        assert_eq!(
            RecordingState::from_token("recording\n"),
            RecordingState::Recording
        );
        assert_eq!(
            RecordingState::from_token("  recording  "),
            RecordingState::Recording
        );
    }

    #[test]
    fn test_from_token_case_sensitive() {
        assert_eq!(
            RecordingState::from_token("Recording"),
            RecordingState::Unknown
        );
        assert_eq!(
            RecordingState::from_token("RECORDING"),
            RecordingState::Unknown
        );
    }

    #[test]
    fn test_from_token_unrecognized_content() {
        assert_eq!(RecordingState::from_token(""), RecordingState::Unknown);
        assert_eq!(
            RecordingState::from_token("transcribing"),
            RecordingState::Unknown
        );
    }

    #[test]
    fn test_normalized_collapses_unknown() {
        assert_eq!(RecordingState::Unknown.normalized(), RecordingState::Idle);
        assert_eq!(RecordingState::Idle.normalized(), RecordingState::Idle);
        assert_eq!(
            RecordingState::Recording.normalized(),
            RecordingState::Recording
        );
    }

    #[test]
    fn test_query_missing_file_is_idle() {
        let dir = tempfile::tempdir().unwrap();
        let observer = StatusObserver::new(dir.path().join("no_such_status"));
        assert_eq!(observer.query(), RecordingState::Idle);
    }

    #[test]
    fn test_query_recording_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status");
        fs::write(&path, "recording\n").unwrap();

        let observer = StatusObserver::new(&path);
        assert_eq!(observer.query(), RecordingState::Recording);
    }

    #[test]
    fn test_query_sequential_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status");
        let observer = StatusObserver::new(&path);

        fs::write(&path, "recording").unwrap();
        assert_eq!(observer.query(), RecordingState::Recording);

        fs::write(&path, "idle").unwrap();
        assert_eq!(observer.query(), RecordingState::Idle);
    }

    #[test]
    fn test_query_empty_and_garbage_are_idle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status");
        let observer = StatusObserver::new(&path);

        fs::write(&path, "").unwrap();
        assert_eq!(observer.query(), RecordingState::Idle);

        fs::write(&path, "Recording").unwrap();
        assert_eq!(observer.query(), RecordingState::Idle);
    }

    #[test]
    fn test_query_non_utf8_is_idle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let observer = StatusObserver::new(&path);
        assert_eq!(observer.query(), RecordingState::Idle);
    }

    #[test]
    fn test_query_unreadable_path_is_idle() {
        // A directory at the status path makes the read fail without
        // depending on permission bits (which root bypasses)
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status");
        fs::create_dir(&path).unwrap();

        let observer = StatusObserver::new(&path);
        assert_eq!(observer.query(), RecordingState::Idle);
    }
}
