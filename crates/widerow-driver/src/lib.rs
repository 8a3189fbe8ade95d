//! # widerow-driver
//!
//! Reads and writes wide rows through a [`ColumnFamilySession`].
//!
//! A wide row is a row key holding an ordered collection of named columns,
//! each with a value and an optional time-to-live. The driver exposes two
//! operations:
//!
//! - **`fetch_data`**: one directional, optionally bounded, count-limited
//!   slice read, mapped to [`Entry`] values
//! - **`update`**: one atomic batch that may drop the row, remove columns and
//!   upsert columns
//!
//! The work is split between three stateless pieces:
//!
//! - [`RangeFetcher`] turns a [`ColumnRange`] into a single engine read
//! - [`ResultMapper`] turns raw engine columns into entries
//! - [`MutationComposer`] turns a [`RowUpdate`] into a single engine batch
//!
//! Every operation is wrapped by an [`InstrumentationHook`]. Row keys, column
//! names and values go through pluggable [`Codec`]s.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use widerow_driver::{EntryColumn, Serializers, WideRowDriver};
//! use widerow_engine::MemoryEngine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Arc::new(MemoryEngine::with_column_families(["events"]));
//!     let driver = WideRowDriver::builder(engine, Serializers::strings())
//!         .column_family("events")
//!         .build()?;
//!
//!     let columns = vec![
//!         EntryColumn::new("2024-01-01", "created"),
//!         EntryColumn::new("2024-01-02", "viewed").with_ttl(3600),
//!     ];
//!     driver.update("order-17".into(), false, vec![], columns).await?;
//!
//!     // Newest first.
//!     let latest = driver
//!         .fetch_data(&"order-17".into(), false, None, None, 1)
//!         .await?;
//!     println!("{:?}", latest[0].column);
//!     Ok(())
//! }
//! ```
//!
//! [`ColumnFamilySession`]: widerow_engine::ColumnFamilySession

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Codecs.
pub mod codec;

/// Error types.
pub mod error;

/// Instrumentation hooks.
pub mod hook;

mod compose;
mod driver;
mod fetch;
mod mapper;
mod ttl;

#[cfg(test)]
mod mock;

pub use codec::{
    BytesCodec, Codec, CodecError, CodecResult, JsonCodec, Serializers, U64Codec, Utf8Codec,
};
pub use compose::{MutationComposer, RowUpdate};
pub use driver::{
    DecodedColumn, DecodedEntry, DecodedUpdate, WideRowDriver, WideRowDriverBuilder,
};
pub use error::{DriverError, DriverResult};
pub use fetch::{ColumnRange, RangeFetcher};
pub use hook::{InstrumentationHook, NoopHook, OperationStats, TimingHook};
pub use mapper::ResultMapper;
pub use ttl::{ttl_from_raw, ttl_to_raw};

pub use widerow_common::{DriverConfig, Entry, EntryColumn};
