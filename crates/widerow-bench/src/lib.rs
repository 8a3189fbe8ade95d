//! widerow performance benchmarks
//!
//! This crate contains benchmarks for the driver over both engines:
//! - Range reads of varying width and direction
//! - Batched updates of varying size
//! - Mapping cost of the read path
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench -p widerow-bench
//! ```

pub mod utils;
