//! # widerow-test
//!
//! Integration tests for widerow.
//!
//! This crate contains:
//! - Driver fixtures over the memory and persistent engines
//! - A fault-injecting session for failure tests
//! - Deterministic workload generators
//!
//! The tests themselves live in `tests/`.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Test utilities and fixtures
pub mod utils;

/// Fault injection
pub mod chaos;

/// Workload generators
pub mod workload;
