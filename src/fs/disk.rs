//! Disk Backend
//!
//! Persistent storage rooted at a base directory. Contents survive
//! process restarts. References are resolved strictly under the root;
//! `..` components cannot escape it.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::fs;

use super::types::*;

/// Persistent disk-backed storage backend.
pub struct DiskFs {
    root: PathBuf,
}

impl DiskFs {
    /// Create a backend rooted at the given directory.
    ///
    /// The root is not touched here; an inaccessible root surfaces as an
    /// error on the first operation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a reference to an absolute path under the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let mut resolved = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::ParentDir => {
                    if resolved != self.root {
                        resolved.pop();
                    }
                }
                // RootDir and CurDir are dropped: all references are
                // relative to the backend root.
                _ => {}
            }
        }
        resolved
    }
}

fn mode_of(metadata: &std::fs::Metadata) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o7777
    }
    #[cfg(not(unix))]
    {
        if metadata.is_dir() {
            0o755
        } else {
            0o644
        }
    }
}

#[async_trait]
impl FileBackend for DiskFs {
    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), FsError> {
        let full = self.resolve(path);
        if let Ok(metadata) = fs::metadata(&full).await {
            if metadata.is_dir() {
                return Err(FsError::IsDirectory {
                    path: path.to_string(),
                    operation: "write".to_string(),
                });
            }
        }
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FsError::from_io(e, path, "write"))?;
        }
        fs::write(&full, content)
            .await
            .map_err(|e| FsError::from_io(e, path, "write"))
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let full = self.resolve(path);
        if let Ok(metadata) = fs::metadata(&full).await {
            if metadata.is_dir() {
                return Err(FsError::IsDirectory {
                    path: path.to_string(),
                    operation: "read".to_string(),
                });
            }
        }
        fs::read(&full)
            .await
            .map_err(|e| FsError::from_io(e, path, "open"))
    }

    async fn stat(&self, path: &str) -> Result<FileStat, FsError> {
        let full = self.resolve(path);
        let metadata = fs::metadata(&full)
            .await
            .map_err(|e| FsError::from_io(e, path, "stat"))?;
        Ok(FileStat {
            is_file: metadata.is_file(),
            is_directory: metadata.is_dir(),
            mode: mode_of(&metadata),
            size: metadata.len(),
            mtime: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        })
    }

    async fn exists(&self, path: &str) -> bool {
        fs::metadata(self.resolve(path)).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let fs = DiskFs::new(dir.path());
        fs.write_file("files/1", b"testfile1").await.unwrap();
        let content = fs.read_file("files/1").await.unwrap();
        assert_eq!(content, b"testfile1");
        assert!(dir.path().join("files/1").is_file());
    }

    #[tokio::test]
    async fn test_stat_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let fs = DiskFs::new(dir.path());
        fs.write_file("f", b"hello").await.unwrap();
        let stat = fs.stat("f").await.unwrap();
        assert!(stat.is_file);
        assert_eq!(stat.size, 5);
    }

    #[tokio::test]
    async fn test_stat_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fs = DiskFs::new(dir.path());
        let err = fs.stat("missing").await.unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_contents_survive_backend_recreation() {
        let dir = tempfile::tempdir().unwrap();
        {
            let fs = DiskFs::new(dir.path());
            fs.write_file("keep", b"durable").await.unwrap();
        }
        let fs = DiskFs::new(dir.path());
        assert_eq!(fs.read_file("keep").await.unwrap(), b"durable");
    }

    #[tokio::test]
    async fn test_parent_dir_cannot_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let fs = DiskFs::new(dir.path());
        fs.write_file("../escape", b"x").await.unwrap();
        assert!(dir.path().join("escape").is_file());
    }

    #[tokio::test]
    async fn test_absolute_reference_lands_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let fs = DiskFs::new(dir.path());
        fs.write_file("/files/1", b"x").await.unwrap();
        assert!(dir.path().join("files/1").is_file());
    }

    #[tokio::test]
    async fn test_read_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let fs = DiskFs::new(dir.path());
        fs.write_file("sub/f", b"x").await.unwrap();
        let err = fs.read_file("sub").await.unwrap_err();
        assert!(matches!(err, FsError::IsDirectory { .. }));
    }
}
