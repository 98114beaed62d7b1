//! Database Layer
//!
//! SQLite engine wrapper and relational fixture loading for the file
//! domain. Only exercised by the test bootstrap and per-test resets;
//! production persistence of file metadata is a calling-layer concern.

pub mod engine;
pub mod fixtures;

pub use engine::Engine;
pub use fixtures::{FixtureDialect, FixtureError, FixtureLoader};
