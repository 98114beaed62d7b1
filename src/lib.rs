//! filestore - storage-backend abstraction for file handling
//!
//! Decouples storing, retrieving, and statting files from the concrete
//! medium holding the bytes: the same calling code works against the
//! disk-backed backend in production and the in-memory backend under
//! test. Also provides the deterministic test bootstrap that keeps the
//! relational fixture set and the file fixture set mutually consistent.

pub mod config;
pub mod db;
pub mod fs;
pub mod model;
pub mod store;
pub mod testing;

pub use config::Config;
pub use fs::{FileBackend, FileStat, FsError};
pub use store::FileStore;
pub use testing::TestEnvironment;
