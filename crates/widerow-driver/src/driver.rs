//! The driver facade.

use std::sync::Arc;

use widerow_common::{DriverConfig, Entry, EntryColumn, OP_FETCH_DATA, OP_UPDATE};
use widerow_engine::ColumnFamilySession;

use crate::codec::{Codec, Serializers};
use crate::compose::{MutationComposer, RowUpdate};
use crate::error::DriverResult;
use crate::fetch::{ColumnRange, RangeFetcher};
use crate::hook::{InstrumentationHook, NoopHook};

/// Entry produced by a driver with codecs `K`, `N`, `V`.
pub type DecodedEntry<K, N, V> =
    Entry<<K as Codec>::Value, <N as Codec>::Value, <V as Codec>::Value>;

/// Column accepted by a driver with codecs `N`, `V`.
pub type DecodedColumn<N, V> = EntryColumn<<N as Codec>::Value, <V as Codec>::Value>;

/// Update accepted by a driver with codecs `K`, `N`, `V`.
pub type DecodedUpdate<K, N, V> =
    RowUpdate<<K as Codec>::Value, <N as Codec>::Value, <V as Codec>::Value>;

/// Reads and writes wide rows of one column family.
///
/// The driver keeps no per-call state; it can be shared between tasks.
///
/// # Example
///
/// ```rust,ignore
/// let engine = Arc::new(MemoryEngine::with_column_families(["users"]));
/// let driver = WideRowDriver::builder(engine, Serializers::strings())
///     .column_family("users")
///     .build()?;
///
/// driver
///     .update("alice".into(), false, vec![], vec![EntryColumn::new("email", "a@example.com")])
///     .await?;
/// let entries = driver.fetch_data(&"alice".into(), true, None, None, 10).await?;
/// ```
pub struct WideRowDriver<S: ?Sized, K, N, V, H = NoopHook> {
    session: Arc<S>,
    serializers: Serializers<K, N, V>,
    config: DriverConfig,
    hook: H,
}

impl<S, K, N, V> WideRowDriver<S, K, N, V, NoopHook>
where
    S: ColumnFamilySession + ?Sized,
{
    /// Starts building a driver over `session`.
    pub fn builder(
        session: Arc<S>,
        serializers: Serializers<K, N, V>,
    ) -> WideRowDriverBuilder<S, K, N, V, NoopHook> {
        WideRowDriverBuilder {
            session,
            serializers,
            config: DriverConfig::default(),
            hook: NoopHook,
        }
    }
}

impl<S, K, N, V, H> WideRowDriver<S, K, N, V, H>
where
    S: ColumnFamilySession + ?Sized,
    K: Codec,
    N: Codec,
    V: Codec,
    H: InstrumentationHook,
{
    /// Returns the engine session.
    pub fn session(&self) -> &Arc<S> {
        &self.session
    }

    /// Returns the column family this driver reads and writes.
    pub fn column_family(&self) -> &str {
        &self.config.column_family
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Returns the instrumentation hook.
    pub fn hook(&self) -> &H {
        &self.hook
    }

    /// Returns a range fetcher bound to this driver's session and codecs.
    pub fn fetcher(&self) -> RangeFetcher<'_, S, K, N, V> {
        RangeFetcher::new(&*self.session, &self.config.column_family, &self.serializers)
    }

    /// Returns a mutation composer bound to this driver's session and codecs.
    pub fn composer(&self) -> MutationComposer<'_, S, K, N, V> {
        MutationComposer::new(&*self.session, &self.config.column_family, &self.serializers)
            .reject_drop_with_insert(self.config.reject_drop_with_insert)
    }

    /// Reads at most `limit` columns of `row_key` between the inclusive
    /// bounds `from` and `to`, in ascending or descending name order.
    pub async fn fetch_data(
        &self,
        row_key: &K::Value,
        ascending: bool,
        from: Option<N::Value>,
        to: Option<N::Value>,
        limit: u32,
    ) -> DriverResult<Vec<DecodedEntry<K, N, V>>> {
        let range = ColumnRange {
            ascending,
            from,
            to,
            limit,
        };
        self.fetch_range(row_key, &range).await
    }

    /// Reads the columns of `row_key` selected by `range`.
    pub async fn fetch_range(
        &self,
        row_key: &K::Value,
        range: &ColumnRange<N::Value>,
    ) -> DriverResult<Vec<DecodedEntry<K, N, V>>> {
        let fetcher = self.fetcher();
        self.hook
            .wrap(OP_FETCH_DATA, fetcher.fetch(row_key, range))
            .await
    }

    /// Drops the row if `drop`, then removes the `remove` columns, then
    /// upserts the `insert` columns, as one atomic batch.
    pub async fn update(
        &self,
        row_key: K::Value,
        drop: bool,
        remove: Vec<N::Value>,
        insert: Vec<DecodedColumn<N, V>>,
    ) -> DriverResult<()> {
        let update = RowUpdate {
            row_key,
            drop,
            remove,
            insert,
        };
        self.apply(&update).await
    }

    /// Applies `update` as one atomic batch.
    pub async fn apply(&self, update: &DecodedUpdate<K, N, V>) -> DriverResult<()> {
        let composer = self.composer();
        self.hook.wrap(OP_UPDATE, composer.submit(update)).await
    }
}

/// Builder for [`WideRowDriver`].
pub struct WideRowDriverBuilder<S: ?Sized, K, N, V, H = NoopHook> {
    session: Arc<S>,
    serializers: Serializers<K, N, V>,
    config: DriverConfig,
    hook: H,
}

impl<S, K, N, V, H> WideRowDriverBuilder<S, K, N, V, H>
where
    S: ColumnFamilySession + ?Sized,
    H: InstrumentationHook,
{
    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the column family.
    #[must_use]
    pub fn column_family(mut self, column_family: impl Into<String>) -> Self {
        self.config.column_family = column_family.into();
        self
    }

    /// Fail updates that drop the row and insert columns in the same call.
    #[must_use]
    pub fn reject_drop_with_insert(mut self, reject: bool) -> Self {
        self.config.reject_drop_with_insert = reject;
        self
    }

    /// Sets the instrumentation hook.
    pub fn hook<H2: InstrumentationHook>(self, hook: H2) -> WideRowDriverBuilder<S, K, N, V, H2> {
        WideRowDriverBuilder {
            session: self.session,
            serializers: self.serializers,
            config: self.config,
            hook,
        }
    }

    /// Validates the configuration and builds the driver.
    pub fn build(self) -> DriverResult<WideRowDriver<S, K, N, V, H>> {
        self.config.validate()?;
        Ok(WideRowDriver {
            session: self.session,
            serializers: self.serializers,
            config: self.config,
            hook: self.hook,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{JsonCodec, U64Codec, Utf8Codec};
    use crate::error::DriverError;
    use crate::hook::TimingHook;
    use crate::mock::RecordingSession;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;
    use widerow_engine::{EngineError, MemoryEngine, RawColumn, SliceRange};

    type StringDriver<S, H = NoopHook> = WideRowDriver<S, Utf8Codec, Utf8Codec, Utf8Codec, H>;

    fn memory_driver() -> StringDriver<MemoryEngine> {
        let engine = Arc::new(MemoryEngine::with_column_families(["users"]));
        WideRowDriver::builder(engine, Serializers::strings())
            .column_family("users")
            .build()
            .unwrap()
    }

    fn col(name: &str, value: &str) -> EntryColumn<String, String> {
        EntryColumn::new(name, value)
    }

    #[tokio::test]
    async fn test_update_then_fetch() {
        let driver = memory_driver();
        let row = "alice".to_string();

        driver
            .update(
                row.clone(),
                false,
                vec![],
                vec![col("n2", "v2").with_ttl(30), col("n1", "v1")],
            )
            .await
            .unwrap();

        let entries = driver.fetch_data(&row, true, None, None, 10).await.unwrap();
        let columns: Vec<_> = entries.into_iter().map(|e| e.column).collect();
        assert_eq!(columns, vec![col("n1", "v1"), col("n2", "v2").with_ttl(30)]);
    }

    #[tokio::test]
    async fn test_descending_bounds() {
        let driver = memory_driver();
        let row = "r".to_string();
        let insert = ["a", "b", "c", "d", "e"].map(|n| col(n, n)).to_vec();
        driver.update(row.clone(), false, vec![], insert).await.unwrap();

        let entries = driver
            .fetch_data(&row, false, Some("d".into()), Some("b".into()), 10)
            .await
            .unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.column.name.as_str()).collect();
        assert_eq!(names, vec!["d", "c", "b"]);
    }

    #[tokio::test]
    async fn test_builder_rejects_empty_column_family() {
        let engine = Arc::new(MemoryEngine::new());
        let result = WideRowDriver::builder(engine, Serializers::strings())
            .column_family("")
            .build();
        assert!(matches!(result, Err(DriverError::Config(_))));
    }

    #[tokio::test]
    async fn test_config_reaches_composer() {
        let engine = Arc::new(MemoryEngine::with_column_families(["users"]));
        let driver = WideRowDriver::builder(engine, Serializers::strings())
            .config(DriverConfig::new("users").reject_drop_with_insert(true))
            .build()
            .unwrap();

        let err = driver
            .update("r".into(), true, vec![], vec![col("a", "1")])
            .await
            .unwrap_err();
        assert!(matches!(err, DriverError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_hook_sees_both_operations() {
        let session = Arc::new(RecordingSession::new());
        let driver: StringDriver<RecordingSession, TimingHook> =
            WideRowDriver::builder(Arc::clone(&session), Serializers::strings())
                .column_family("cf")
                .hook(TimingHook::new(Duration::from_secs(1)))
                .build()
                .unwrap();

        driver
            .fetch_data(&"r".into(), true, None, None, 5)
            .await
            .unwrap();
        driver
            .update("r".into(), true, vec![], vec![])
            .await
            .unwrap();

        assert_eq!(driver.hook().stats(OP_FETCH_DATA).unwrap().calls, 1);
        assert_eq!(driver.hook().stats(OP_UPDATE).unwrap().calls, 1);
        assert_eq!(session.reads()[0].2, SliceRange::new(false, 5));
    }

    #[tokio::test]
    async fn test_hook_records_relayed_failure() {
        let session = Arc::new(
            RecordingSession::new().failing_with(|| EngineError::Unavailable("gone".into())),
        );
        let driver = WideRowDriver::builder(session, Serializers::strings())
            .column_family("cf")
            .hook(Arc::new(TimingHook::default()))
            .build()
            .unwrap();

        let err = driver
            .fetch_data(&"r".to_string(), true, None, None, 5)
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        let stats = driver.hook().stats(OP_FETCH_DATA).unwrap();
        assert_eq!((stats.calls, stats.failures), (1, 1));
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Reading {
        celsius: f32,
    }

    #[tokio::test]
    async fn test_typed_codecs() {
        let session = Arc::new(RecordingSession::new().with_columns(vec![RawColumn::new(
            10u64.to_be_bytes().to_vec(),
            r#"{"celsius":21.5}"#,
            0,
        )]));
        let serializers = Serializers::new(Utf8Codec, U64Codec, JsonCodec::<Reading>::new());
        let driver = WideRowDriver::builder(session, serializers)
            .column_family("sensors")
            .build()
            .unwrap();

        let entries = driver
            .fetch_data(&"probe-1".into(), true, Some(5), None, 10)
            .await
            .unwrap();
        assert_eq!(entries[0].column.name, 10);
        assert_eq!(entries[0].column.value, Reading { celsius: 21.5 });
    }

    #[tokio::test]
    async fn test_dyn_session() {
        let engine: Arc<dyn ColumnFamilySession> =
            Arc::new(MemoryEngine::with_column_families(["default"]));
        let driver = WideRowDriver::builder(engine, Serializers::strings())
            .build()
            .unwrap();
        driver
            .update("r".into(), false, vec![], vec![col("a", "1")])
            .await
            .unwrap();
        assert_eq!(driver.fetch_data(&"r".into(), true, None, None, 1).await.unwrap().len(), 1);
    }
}
