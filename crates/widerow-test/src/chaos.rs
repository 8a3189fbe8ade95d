use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use bytes::Bytes;
use tracing::warn;

use widerow_engine::{
    ColumnFamilySession, EngineError, EngineFuture, MutationBatch, RawColumn, SliceRange,
};

/// Wraps a session and fails calls on demand.
///
/// A failed call never reaches the inner session.
#[derive(Debug)]
pub struct FaultySession<S> {
    inner: S,
    fail_reads: AtomicBool,
    fail_batches: AtomicBool,
    rejected: AtomicU64,
}

impl<S> FaultySession<S> {
    /// Wraps `inner` with no faults enabled.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_batches: AtomicBool::new(false),
            rejected: AtomicU64::new(0),
        }
    }

    /// Fails every read while enabled.
    pub fn fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    /// Fails every batch while enabled.
    pub fn fail_batches(&self, enabled: bool) {
        self.fail_batches.store(enabled, Ordering::SeqCst);
    }

    /// Number of calls failed so far.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::SeqCst)
    }

    /// The wrapped session.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn reject(&self, operation: &str) -> EngineError {
        self.rejected.fetch_add(1, Ordering::SeqCst);
        warn!(operation, "injected fault");
        EngineError::Unavailable(format!("injected fault in {operation}"))
    }
}

impl<S: ColumnFamilySession> ColumnFamilySession for FaultySession<S> {
    fn get_slice<'a>(
        &'a self,
        column_family: &'a str,
        row_key: Bytes,
        range: SliceRange,
    ) -> EngineFuture<'a, Vec<RawColumn>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            let err = self.reject("get_slice");
            return Box::pin(async move { Err(err) });
        }
        self.inner.get_slice(column_family, row_key, range)
    }

    fn execute_batch(&self, batch: MutationBatch) -> EngineFuture<'_, ()> {
        if self.fail_batches.load(Ordering::SeqCst) {
            let err = self.reject("execute_batch");
            return Box::pin(async move { Err(err) });
        }
        self.inner.execute_batch(batch)
    }
}
