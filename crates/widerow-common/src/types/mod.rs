//! Storage-agnostic entities exchanged with callers.

mod entry;

pub use entry::{Entry, EntryColumn};
