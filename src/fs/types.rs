//! Backend Types
//!
//! Core types and the trait implemented by every storage backend.

use async_trait::async_trait;
use std::time::SystemTime;
use thiserror::Error;

/// Storage backend errors
#[derive(Error, Debug, Clone)]
pub enum FsError {
    #[error("ENOENT: no such file, {operation} '{path}'")]
    NotFound { path: String, operation: String },

    #[error("EISDIR: illegal operation on a directory, {operation} '{path}'")]
    IsDirectory { path: String, operation: String },

    #[error("EIO: i/o error, {operation} '{path}': {message}")]
    Io {
        path: String,
        operation: String,
        message: String,
    },
}

impl FsError {
    /// Map an I/O error from the underlying medium, keeping the
    /// not-found kind distinct from everything else.
    pub fn from_io(err: std::io::Error, path: &str, operation: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound {
                path: path.to_string(),
                operation: operation.to_string(),
            },
            _ => FsError::Io {
                path: path.to_string(),
                operation: operation.to_string(),
                message: err.to_string(),
            },
        }
    }
}

/// File metadata as reported by a backend.
#[derive(Debug, Clone)]
pub struct FileStat {
    pub is_file: bool,
    pub is_directory: bool,
    pub mode: u32,
    pub size: u64,
    pub mtime: SystemTime,
}

/// Storage backend interface.
///
/// Exactly one implementation is active per store. Implementations store
/// and retrieve bytes at path-like references; they do not interpret what
/// a stored file represents.
#[async_trait]
pub trait FileBackend: Send + Sync {
    /// Write content to a file, creating it if it doesn't exist.
    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), FsError>;

    /// Read the contents of a file as bytes.
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError>;

    /// Get file metadata.
    async fn stat(&self, path: &str) -> Result<FileStat, FsError>;

    /// Check if a path exists.
    async fn exists(&self, path: &str) -> bool;
}
