//! A session that records requests, for unit tests.

use bytes::Bytes;
use parking_lot::Mutex;

use widerow_engine::{
    ColumnFamilySession, EngineError, EngineFuture, MutationBatch, RawColumn, SliceRange,
};

#[derive(Default)]
pub(crate) struct RecordingSession {
    columns: Vec<RawColumn>,
    failure: Option<fn() -> EngineError>,
    reads: Mutex<Vec<(String, Bytes, SliceRange)>>,
    batches: Mutex<Vec<MutationBatch>>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns returned by every read.
    pub fn with_columns(mut self, columns: Vec<RawColumn>) -> Self {
        self.columns = columns;
        self
    }

    pub fn failing_with(mut self, failure: fn() -> EngineError) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn reads(&self) -> Vec<(String, Bytes, SliceRange)> {
        self.reads.lock().clone()
    }

    pub fn batches(&self) -> Vec<MutationBatch> {
        self.batches.lock().clone()
    }

    fn respond(&self) -> Result<(), EngineError> {
        match self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

impl ColumnFamilySession for RecordingSession {
    fn get_slice<'a>(
        &'a self,
        column_family: &'a str,
        row_key: Bytes,
        range: SliceRange,
    ) -> EngineFuture<'a, Vec<RawColumn>> {
        self.reads
            .lock()
            .push((column_family.to_string(), row_key, range.clone()));
        Box::pin(async move {
            self.respond()?;
            Ok(self
                .columns
                .iter()
                .take(range.count as usize)
                .cloned()
                .collect())
        })
    }

    fn execute_batch(&self, batch: MutationBatch) -> EngineFuture<'_, ()> {
        self.batches.lock().push(batch);
        let result = self.respond();
        Box::pin(async move { result })
    }
}
