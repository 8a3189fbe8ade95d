use std::sync::Arc;

use tempfile::TempDir;

use widerow_common::{EngineConfig, Entry, EntryColumn};
use widerow_driver::{NoopHook, Serializers, Utf8Codec, WideRowDriver};
use widerow_engine::{ColumnFamilySession, FjallEngine, MemoryEngine};

/// Column family every fixture opens.
pub const TEST_COLUMN_FAMILY: &str = "wide";

/// Driver over string keys, names and values.
pub type TestDriver<S, H = NoopHook> = WideRowDriver<S, Utf8Codec, Utf8Codec, Utf8Codec, H>;

/// Entry type returned by [`TestDriver`].
pub type TestEntry = Entry<String, String, String>;

/// Builds a driver over `session` for [`TEST_COLUMN_FAMILY`].
pub fn driver_over<S: ColumnFamilySession>(session: Arc<S>) -> TestDriver<S> {
    WideRowDriver::builder(session, Serializers::strings())
        .column_family(TEST_COLUMN_FAMILY)
        .build()
        .expect("fixture driver config is valid")
}

/// A fresh memory engine with [`TEST_COLUMN_FAMILY`].
pub fn memory_engine() -> Arc<MemoryEngine> {
    Arc::new(MemoryEngine::with_column_families([TEST_COLUMN_FAMILY]))
}

/// A driver over a fresh memory engine.
pub fn memory_driver() -> TestDriver<MemoryEngine> {
    driver_over(memory_engine())
}

/// A persistent engine in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct FjallFixture {
    /// Data directory.
    pub dir: TempDir,
    /// The engine.
    pub engine: Arc<FjallEngine>,
}

impl FjallFixture {
    /// Opens an engine in a new temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let engine = Self::open(&dir);
        Self { dir, engine }
    }

    /// Opens another engine over the same directory.
    pub fn reopen(&mut self) {
        self.engine = Self::open(&self.dir);
    }

    /// A driver over the engine.
    pub fn driver(&self) -> TestDriver<FjallEngine> {
        driver_over(Arc::clone(&self.engine))
    }

    fn open(dir: &TempDir) -> Arc<FjallEngine> {
        let config = EngineConfig::with_data_dir(dir.path()).column_family(TEST_COLUMN_FAMILY);
        Arc::new(FjallEngine::open(&config).expect("open fjall engine"))
    }
}

impl Default for FjallFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A column without ttl.
pub fn column(name: &str, value: &str) -> EntryColumn<String, String> {
    EntryColumn::new(name, value)
}

/// Column names of `entries`, in order.
pub fn names(entries: &[TestEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.column.name.as_str()).collect()
}
