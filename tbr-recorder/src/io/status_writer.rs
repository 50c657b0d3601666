//! JSONL status side-channel.
//!
//! One JSON line per closed window summarizing pipeline health, so an
//! operator can watch drops and discards without parsing the baseline CSV.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use tbr_fs::{Filesystem, SinkError};

/// One status heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    /// Wall-clock time of the heartbeat, Unix milliseconds.
    pub ts_ms: u64,
    /// Windows closed so far.
    pub windows_closed: u64,
    /// Windows durably written to the baseline log.
    pub windows_written: u64,
    /// Windows lost to the drop-oldest policy.
    pub windows_dropped: u64,
    /// Classified events ingested.
    pub events: u64,
    /// Captured packets discarded as non-IPv4/TCP.
    pub discards: u64,
}

/// Appends status lines to a JSONL file.
pub struct StatusWriter<F: Filesystem> {
    fs: F,
    path: PathBuf,
}

impl<F: Filesystem> StatusWriter<F> {
    pub fn new(fs: F, path: PathBuf) -> Self {
        Self { fs, path }
    }

    /// Append one status line. Failures here are operational noise, never
    /// fatal; the caller decides whether to log them.
    pub fn append(&self, status: &StatusLine) -> Result<(), SinkError> {
        let mut line = serde_json::to_string(status)
            .map_err(|e| SinkError::Io(format!("status serialization: {}", e)))?;
        line.push('\n');
        self.fs.append_atomic(&self.path, line.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tbr_fs::MockFilesystem;

    fn status(ts_ms: u64) -> StatusLine {
        StatusLine {
            ts_ms,
            windows_closed: 3,
            windows_written: 2,
            windows_dropped: 1,
            events: 42,
            discards: 5,
        }
    }

    #[test]
    fn test_append_writes_json_line() {
        let fs = MockFilesystem::new();
        let path = PathBuf::from("/tmp/status.jsonl");
        let writer = StatusWriter::new(fs.clone(), path.clone());

        writer.append(&status(1000)).expect("append");

        let content = fs.get_file_string(&path).expect("file");
        assert!(content.ends_with('\n'));

        let restored: StatusLine = serde_json::from_str(content.trim()).expect("parse");
        assert_eq!(restored, status(1000));
    }

    #[test]
    fn test_append_accumulates_lines() {
        let fs = MockFilesystem::new();
        let path = PathBuf::from("/tmp/status.jsonl");
        let writer = StatusWriter::new(fs.clone(), path.clone());

        writer.append(&status(1000)).expect("append 1");
        writer.append(&status(2000)).expect("append 2");

        let content = fs.get_file_string(&path).expect("file");
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_append_surfaces_fs_error() {
        let fs = MockFilesystem::new();
        fs.set_append_failure(Some(SinkError::DiskFull));
        let writer = StatusWriter::new(fs, PathBuf::from("/tmp/status.jsonl"));

        assert_eq!(writer.append(&status(1000)).unwrap_err(), SinkError::DiskFull);
    }

    #[test]
    fn test_status_line_field_names() {
        let json = serde_json::to_string(&status(7)).expect("serialize");
        for field in [
            "ts_ms",
            "windows_closed",
            "windows_written",
            "windows_dropped",
            "events",
            "discards",
        ] {
            assert!(json.contains(field), "missing field {}", field);
        }
    }
}
