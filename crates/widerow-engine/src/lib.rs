//! # widerow-engine
//!
//! The storage-engine seam for widerow and two engines behind it.
//!
//! A [`ColumnFamilySession`] is everything the driver needs from a
//! column-family store:
//!
//! - an asynchronous range read over one row's columns ([`SliceRange`] in,
//!   [`RawColumn`]s out), answered in a single round trip;
//! - an asynchronous atomic batch mutation ([`MutationBatch`]) combining an
//!   optional whole-row delete, column deletions and column upserts.
//!
//! Engines:
//!
//! - [`MemoryEngine`]: in-process maps, for tests and embedding
//! - [`FjallEngine`]: persistent LSM keyspace, one partition per column family
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       widerow-driver                         │
//! │        (range fetch, mutation composition, mapping)          │
//! └─────────────────────────────────────────────────────────────┘
//!                               │  SliceRange / MutationBatch
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   ColumnFamilySession                        │
//! │  ┌──────────────────────┐      ┌──────────────────────┐     │
//! │  │     MemoryEngine     │      │      FjallEngine     │     │
//! │  │  (BTreeMap per row)  │      │ (partition per CF)   │     │
//! │  └──────────────────────┘      └──────────────────────┘     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod memory;
mod mutation;
mod persistent;
mod slice;

pub use error::{EngineError, EngineResult};
pub use memory::MemoryEngine;
pub use mutation::{Mutation, MutationBatch};
pub use persistent::FjallEngine;
pub use slice::{RawColumn, SliceRange, NO_TTL};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;

/// Boxed future returned by engine operations.
pub type EngineFuture<'a, T> = Pin<Box<dyn Future<Output = EngineResult<T>> + Send + 'a>>;

/// A session against a column-family storage engine.
///
/// Implementations are shared between concurrent callers and must not keep
/// per-call state. Every call is one round trip; failures are reported through
/// the returned future.
pub trait ColumnFamilySession: Send + Sync {
    /// Reads the columns of `row_key` selected by `range`.
    ///
    /// Columns come back in scan order (ascending name order, or descending
    /// when `range.reversed`), at most `range.count` of them. A missing row
    /// reads as empty.
    fn get_slice<'a>(
        &'a self,
        column_family: &'a str,
        row_key: Bytes,
        range: SliceRange,
    ) -> EngineFuture<'a, Vec<RawColumn>>;

    /// Applies all mutations of `batch` atomically, in order.
    fn execute_batch(&self, batch: MutationBatch) -> EngineFuture<'_, ()>;
}

impl<S: ColumnFamilySession + ?Sized> ColumnFamilySession for Arc<S> {
    fn get_slice<'a>(
        &'a self,
        column_family: &'a str,
        row_key: Bytes,
        range: SliceRange,
    ) -> EngineFuture<'a, Vec<RawColumn>> {
        (**self).get_slice(column_family, row_key, range)
    }

    fn execute_batch(&self, batch: MutationBatch) -> EngineFuture<'_, ()> {
        (**self).execute_batch(batch)
    }
}
