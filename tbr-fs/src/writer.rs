//! Filesystem trait with real and mock implementations.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Errors surfaced by sink writes.
///
/// All variants are reported to the caller; the caller owns the
/// buffering/drop policy. None of these are retried internally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("disk full")]
    DiskFull,

    #[error("permission denied")]
    PermissionDenied,

    #[error("invalid log path: {0}")]
    PathInvalid(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<io::Error> for SinkError {
    fn from(e: io::Error) -> Self {
        // ENOSPC has no stable ErrorKind mapping on older toolchains
        const ENOSPC: i32 = 28;
        if e.raw_os_error() == Some(ENOSPC) {
            return SinkError::DiskFull;
        }
        match e.kind() {
            io::ErrorKind::PermissionDenied => SinkError::PermissionDenied,
            io::ErrorKind::NotFound | io::ErrorKind::InvalidInput => {
                SinkError::PathInvalid(e.to_string())
            }
            _ => SinkError::Io(e.to_string()),
        }
    }
}

/// Trait for the filesystem operations the sink needs.
/// Abstracted for testing with mock implementations.
pub trait Filesystem: Send + Sync {
    /// Append data to a file with a single write followed by a data sync.
    /// Creates the file if it doesn't exist.
    fn append_atomic(&self, path: &Path, data: &[u8]) -> Result<(), SinkError>;

    /// Read file contents as a string.
    fn read_file(&self, path: &Path) -> Result<String, SinkError>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and parents if needed.
    fn create_dir_all(&self, path: &Path) -> Result<(), SinkError>;
}

/// Real filesystem implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFilesystem;

impl Filesystem for RealFilesystem {
    fn append_atomic(&self, path: &Path, data: &[u8]) -> Result<(), SinkError> {
        use std::fs::OpenOptions;
        use std::io::Write;

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        // One write_all per record: an O_APPEND write either lands whole or
        // not at all, so no partial-line corruption on abrupt termination.
        file.write_all(data)?;
        // sync_data skips the metadata sync, still durable for append-only
        file.sync_data()?;

        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String, SinkError> {
        Ok(fs::read_to_string(path)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), SinkError> {
        fs::create_dir_all(path)?;
        Ok(())
    }
}

/// Mock filesystem for testing.
/// Cloning creates a new handle to the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MockFilesystem {
    files: Arc<RwLock<HashMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<RwLock<HashSet<PathBuf>>>,
    append_failure: Arc<RwLock<Option<SinkError>>>,
}

impl MockFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get content of a specific file.
    pub fn get_file(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().unwrap().get(path).cloned()
    }

    /// Get content of a specific file as a string.
    pub fn get_file_string(&self, path: &Path) -> Option<String> {
        self.get_file(path)
            .map(|data| String::from_utf8(data).expect("valid utf8"))
    }

    /// Add a file directly (for test setup).
    pub fn add_file(&self, path: PathBuf, data: Vec<u8>) {
        self.files.write().unwrap().insert(path, data);
    }

    /// Make every subsequent `append_atomic` fail with the given error until
    /// cleared with `None`. Used to simulate disk-full and permission
    /// failures mid-run.
    pub fn set_append_failure(&self, error: Option<SinkError>) {
        *self.append_failure.write().unwrap() = error;
    }
}

impl Filesystem for MockFilesystem {
    fn append_atomic(&self, path: &Path, data: &[u8]) -> Result<(), SinkError> {
        if let Some(error) = self.append_failure.read().unwrap().clone() {
            return Err(error);
        }
        let mut files = self.files.write().unwrap();
        let entry = files.entry(path.to_path_buf()).or_default();
        entry.extend_from_slice(data);
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String, SinkError> {
        let files = self.files.read().unwrap();
        match files.get(path) {
            Some(data) => String::from_utf8(data.clone())
                .map_err(|e| SinkError::Io(format!("invalid utf8: {}", e))),
            None => Err(SinkError::PathInvalid(format!(
                "file not found: {}",
                path.display()
            ))),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path) || self.dirs.read().unwrap().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), SinkError> {
        self.dirs.write().unwrap().insert(path.to_path_buf());
        Ok(())
    }
}
