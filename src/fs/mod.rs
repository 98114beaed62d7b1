//! Storage Backends
//!
//! Provides the backend abstraction for storing and retrieving files.
//! Two implementations exist:
//! - MemoryFs: ephemeral in-memory storage (tests)
//! - DiskFs: persistent storage rooted at a base directory (production)

pub mod types;
pub mod memory;
pub mod disk;

pub use types::*;
pub use memory::MemoryFs;
pub use disk::DiskFs;
