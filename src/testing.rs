//! Test Environment Bootstrap
//!
//! Builds a fully initialized, isolated test environment in one call:
//! fresh database engine, synchronized schema, configuration, relational
//! fixtures, and an ephemeral file store. File fixtures are seeded by a
//! separate call so tests opt into them only when needed.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::db::{Engine, FixtureDialect, FixtureError, FixtureLoader};
use crate::fs::FsError;
use crate::model;
use crate::store::FileStore;

/// Fixture directory, relative to the service root path.
pub const FIXTURE_DIR: &str = "fixtures";

/// File fixtures seeded by [`TestEnvironment::seed_file_fixtures`].
/// Content is fixed so reseeding is byte-identical.
const FILE_FIXTURES: &[(&str, &[u8])] = &[("1", b"testfile1")];

/// A bootstrap step failed. A test run cannot proceed on a
/// half-initialized environment, so callers surface this immediately.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("test engine creation failed: {0}")]
    Engine(rusqlite::Error),

    #[error("schema synchronization failed: {0}")]
    Schema(rusqlite::Error),

    #[error(transparent)]
    Fixtures(#[from] FixtureError),

    #[error("file fixture seeding failed: {0}")]
    Seed(#[from] FsError),
}

/// A fully initialized test environment.
///
/// Each instance is isolated: its own in-memory database, its own
/// ephemeral file store. Constructing a second environment in the same
/// process leaves the first untouched.
pub struct TestEnvironment {
    pub config: Config,
    pub engine: Engine,
    pub store: FileStore,
    fixtures: FixtureLoader,
}

impl TestEnvironment {
    /// Run the bootstrap sequence. Order is load-bearing; later steps
    /// assume earlier ones completed.
    pub fn init() -> Result<Self, BootstrapError> {
        let engine = Engine::create_test().map_err(BootstrapError::Engine)?;
        debug!("test engine created");

        engine
            .sync_schema(&model::tables())
            .map_err(BootstrapError::Schema)?;
        debug!("schema synchronized");

        let mut config = Config::default();
        // The root path is needed for fixture resolution even when no
        // config file is in play.
        config.apply_env();

        let dialect = FixtureDialect::for_database(&config.database_type);
        let fixture_dir = Path::new(&config.service_rootpath).join(FIXTURE_DIR);
        let fixtures = FixtureLoader::init(dialect, &fixture_dir)?;
        fixtures.load(&engine)?;
        debug!(dir = %fixture_dir.display(), "relational fixtures loaded");

        let store = FileStore::ephemeral();

        info!("test environment initialized");
        Ok(Self {
            config,
            engine,
            store,
            fixtures,
        })
    }

    /// Reload the relational fixture set, replacing any rows a test
    /// mutated.
    pub fn load_fixtures(&self) -> Result<(), BootstrapError> {
        self.fixtures.load(&self.engine)?;
        Ok(())
    }

    /// Write the fixed file fixtures into the active store, under the
    /// configured base path. Test callers surface failures through the
    /// test framework (`expect`), never silently.
    pub async fn seed_file_fixtures(&self) -> Result<(), FsError> {
        for (reference, content) in FILE_FIXTURES {
            let path = format!("{}/{}", self.config.files_base_path, reference);
            self.store.write(&path, content).await?;
        }
        Ok(())
    }

    /// Reset both fixture sets in sequence, the usual per-test setup.
    pub async fn init_fixtures(&self) -> Result<(), BootstrapError> {
        self.load_fixtures()?;
        self.seed_file_fixtures().await?;
        Ok(())
    }
}
