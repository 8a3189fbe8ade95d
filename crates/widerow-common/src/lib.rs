//! # widerow-common
//!
//! Common types, errors, and configuration for widerow.
//!
//! This crate provides the storage-agnostic pieces shared by the engine, the
//! driver and the command-line tool:
//!
//! - **Types**: [`Entry`] and [`EntryColumn`], the values returned by reads and
//!   accepted by writes
//! - **Errors**: stable [`ErrorCode`]s that every component error maps onto
//! - **Config**: driver and engine configuration structures
//! - **Constants**: system-wide limits and defaults
//!
//! ## Example
//!
//! ```rust
//! use widerow_common::types::{Entry, EntryColumn};
//!
//! let column: EntryColumn<String, String> = EntryColumn::new("name", "value").with_ttl(30);
//! let entry: Entry<String, String, String> = Entry::new("row-1", column);
//! assert_eq!(entry.column.ttl_seconds, Some(30));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::{DriverConfig, EngineConfig};
pub use constants::*;
pub use error::{ConfigError, ErrorCode};
pub use types::{Entry, EntryColumn};
