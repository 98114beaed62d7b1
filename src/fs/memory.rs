//! In-Memory Backend
//!
//! Ephemeral storage held entirely in process memory. A freshly
//! constructed instance starts empty; contents vanish when it is dropped.

use std::collections::HashMap;
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::types::*;

/// An entry in the in-memory tree.
#[derive(Debug, Clone)]
enum Entry {
    File {
        content: Vec<u8>,
        mode: u32,
        mtime: SystemTime,
    },
    Directory {
        mode: u32,
        mtime: SystemTime,
    },
}

/// Ephemeral in-memory storage backend.
pub struct MemoryFs {
    data: RwLock<HashMap<String, Entry>>,
}

impl MemoryFs {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        let mut data = HashMap::new();
        data.insert(
            "/".to_string(),
            Entry::Directory {
                mode: 0o755,
                mtime: SystemTime::now(),
            },
        );
        Self {
            data: RwLock::new(data),
        }
    }
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Path utilities (free functions operating on the map directly)
// ============================================================================

fn normalize_path(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_string();
    }
    let mut normalized = path.to_string();
    if normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }
    if !normalized.starts_with('/') {
        normalized = format!("/{}", normalized);
    }
    let parts: Vec<&str> = normalized
        .split('/')
        .filter(|p| !p.is_empty() && *p != ".")
        .collect();
    let mut resolved: Vec<&str> = Vec::new();
    for part in parts {
        if part == ".." {
            resolved.pop();
        } else {
            resolved.push(part);
        }
    }
    if resolved.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", resolved.join("/"))
    }
}

fn dirname(path: &str) -> String {
    let normalized = normalize_path(path);
    if normalized == "/" {
        return "/".to_string();
    }
    match normalized.rfind('/') {
        Some(0) => "/".to_string(),
        Some(pos) => normalized[..pos].to_string(),
        None => "/".to_string(),
    }
}

fn ensure_parent_dirs(data: &mut HashMap<String, Entry>, path: &str) {
    let dir = dirname(path);
    if dir == "/" {
        return;
    }
    if !data.contains_key(&dir) {
        ensure_parent_dirs(data, &dir);
        data.insert(
            dir,
            Entry::Directory {
                mode: 0o755,
                mtime: SystemTime::now(),
            },
        );
    }
}

// ============================================================================
// FileBackend trait implementation
// ============================================================================

#[async_trait]
impl FileBackend for MemoryFs {
    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), FsError> {
        let mut data = self.data.write().await;
        let normalized = normalize_path(path);

        if let Some(Entry::Directory { .. }) = data.get(&normalized) {
            return Err(FsError::IsDirectory {
                path: path.to_string(),
                operation: "write".to_string(),
            });
        }

        ensure_parent_dirs(&mut data, &normalized);
        data.insert(
            normalized,
            Entry::File {
                content: content.to_vec(),
                mode: 0o644,
                mtime: SystemTime::now(),
            },
        );
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let data = self.data.read().await;
        let normalized = normalize_path(path);
        match data.get(&normalized) {
            Some(Entry::File { content, .. }) => Ok(content.clone()),
            Some(Entry::Directory { .. }) => Err(FsError::IsDirectory {
                path: path.to_string(),
                operation: "read".to_string(),
            }),
            None => Err(FsError::NotFound {
                path: path.to_string(),
                operation: "open".to_string(),
            }),
        }
    }

    async fn stat(&self, path: &str) -> Result<FileStat, FsError> {
        let data = self.data.read().await;
        let normalized = normalize_path(path);
        match data.get(&normalized) {
            Some(Entry::File {
                content,
                mode,
                mtime,
            }) => Ok(FileStat {
                is_file: true,
                is_directory: false,
                mode: *mode,
                size: content.len() as u64,
                mtime: *mtime,
            }),
            Some(Entry::Directory { mode, mtime }) => Ok(FileStat {
                is_file: false,
                is_directory: true,
                mode: *mode,
                size: 0,
                mtime: *mtime,
            }),
            None => Err(FsError::NotFound {
                path: path.to_string(),
                operation: "stat".to_string(),
            }),
        }
    }

    async fn exists(&self, path: &str) -> bool {
        let data = self.data.read().await;
        data.contains_key(&normalize_path(path))
    }
}

// ============================================================================
// Tests
// ============================================================================
