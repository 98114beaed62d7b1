//! File Store
//!
//! The handle calling code uses for file access. A store holds exactly
//! one backend variant; operations are thin pass-throughs, so behavior
//! (including error kinds) is backend-defined. Replacing a store with a
//! freshly constructed one is the only way to switch variants, and it
//! discards nothing from the old backend except the handle itself.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::fs::{DiskFs, FileBackend, FileStat, FsError, MemoryFs};

/// Handle over the active storage backend.
#[derive(Clone)]
pub struct FileStore {
    backend: Arc<dyn FileBackend>,
}

impl FileStore {
    /// Create a store over the persistent disk backend rooted at `root`.
    ///
    /// Construction is infallible; an inaccessible root is reported by
    /// the first operation that touches it.
    pub fn persistent(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        debug!(root = %root.display(), "installing persistent file backend");
        Self {
            backend: Arc::new(DiskFs::new(root)),
        }
    }

    /// Create a store over a fresh, empty in-memory backend.
    ///
    /// Every call starts from empty; nothing carries over from any
    /// previously constructed store.
    pub fn ephemeral() -> Self {
        debug!("installing ephemeral file backend");
        Self {
            backend: Arc::new(MemoryFs::new()),
        }
    }

    /// Wrap an externally constructed backend.
    pub fn with_backend(backend: Arc<dyn FileBackend>) -> Self {
        Self { backend }
    }

    /// Stat a file by reference.
    pub async fn stat(&self, reference: &str) -> Result<FileStat, FsError> {
        self.backend.stat(reference).await
    }

    /// Write content to a file by reference.
    pub async fn write(&self, reference: &str, content: &[u8]) -> Result<(), FsError> {
        self.backend.write_file(reference, content).await
    }

    /// Read a file's content by reference.
    pub async fn read(&self, reference: &str) -> Result<Vec<u8>, FsError> {
        self.backend.read_file(reference).await
    }

    /// Check whether a reference exists.
    pub async fn exists(&self, reference: &str) -> bool {
        self.backend.exists(reference).await
    }
}
