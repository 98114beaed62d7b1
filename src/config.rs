//! Configuration
//!
//! Process configuration consumed by the store and the test bootstrap:
//! where stored files live, where the service root is, and which database
//! type the relational layer targets. Values come from defaults, an
//! optional TOML file, and an environment override for the root path.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Environment variable overriding the service root path.
pub const SERVICE_ROOTPATH_ENV: &str = "FILESTORE_SERVICE_ROOTPATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file parse failed: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration values for file handling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base path under which stored files are written.
    pub files_base_path: String,
    /// Root path of the service tree; fixture directories resolve
    /// relative to it.
    pub service_rootpath: String,
    /// Database type selector. Only used to pick a fixture dialect.
    pub database_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            files_base_path: "files".to_string(),
            service_rootpath: ".".to_string(),
            database_type: "sqlite".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Apply environment overrides. Currently only the service root path
    /// is overridable; fixture resolution needs it even when no config
    /// file is in play.
    pub fn apply_env(&mut self) {
        if let Ok(rootpath) = std::env::var(SERVICE_ROOTPATH_ENV) {
            if !rootpath.is_empty() {
                self.service_rootpath = rootpath;
            }
        }
    }
}

/// Serializes tests that read or write the process environment; the
/// environment is process-global and test threads run in parallel.
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}
