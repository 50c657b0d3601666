//! Append-only CSV sink for closed windows.

use std::path::{Path, PathBuf};

use tbr_schema::{Window, CSV_HEADER};

use crate::writer::{Filesystem, SinkError};

/// Durable writer for the baseline log.
///
/// Opens the log in append mode and writes the header exactly once, only
/// when the file did not previously exist, so capture sessions across
/// restarts concatenate cleanly. Each closed window is appended as one
/// write (both direction rows, terminating newline included), so a record
/// is either fully present or absent after an abrupt termination.
pub struct CsvSink<F: Filesystem> {
    fs: F,
    path: PathBuf,
}

impl<F: Filesystem> CsvSink<F> {
    /// Open (or create) the baseline log at `path`.
    pub fn open(fs: F, path: PathBuf) -> Result<Self, SinkError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs.create_dir_all(parent)?;
            }
        }

        if !fs.exists(&path) {
            let mut header = String::from(CSV_HEADER);
            header.push('\n');
            fs.append_atomic(&path, header.as_bytes())?;
        }

        Ok(Self { fs, path })
    }

    /// Append one closed window as two CSV rows.
    pub fn append(&self, window: &Window) -> Result<(), SinkError> {
        self.fs
            .append_atomic(&self.path, window.to_csv_rows().as_bytes())
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
