//! Column ranges and raw columns.

use std::ops::Bound;

use bytes::Bytes;

use crate::error::{EngineError, EngineResult};

/// Engine-native ttl meaning "does not expire".
pub const NO_TTL: u32 = 0;

/// A column as stored by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumn {
    /// Encoded column name.
    pub name: Bytes,
    /// Encoded column value.
    pub value: Bytes,
    /// Time-to-live in seconds, [`NO_TTL`] when the column does not expire.
    pub ttl: u32,
}

impl RawColumn {
    /// Creates a raw column.
    pub fn new(name: impl Into<Bytes>, value: impl Into<Bytes>, ttl: u32) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ttl,
        }
    }
}

/// A directional, bounded, count-limited selection over a row's columns.
///
/// `start` is where the scan begins and `finish` where it ends, both
/// inclusive. With `reversed` set the scan runs in descending name order, so
/// `start` is the high bound and `finish` the low bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceRange {
    /// First column name in scan order.
    pub start: Option<Bytes>,
    /// Last column name in scan order.
    pub finish: Option<Bytes>,
    /// Scan in descending name order.
    pub reversed: bool,
    /// Maximum number of columns returned.
    pub count: u32,
}

impl SliceRange {
    /// Creates an unbounded range.
    pub fn new(reversed: bool, count: u32) -> Self {
        Self {
            start: None,
            finish: None,
            reversed,
            count,
        }
    }

    /// Sets the start bound.
    pub fn start(mut self, start: impl Into<Bytes>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Sets the finish bound.
    pub fn finish(mut self, finish: impl Into<Bytes>) -> Self {
        self.finish = Some(finish.into());
        self
    }

    /// Returns the lowest name the range may select.
    pub fn lower(&self) -> Option<&Bytes> {
        if self.reversed {
            self.finish.as_ref()
        } else {
            self.start.as_ref()
        }
    }

    /// Returns the highest name the range may select.
    pub fn upper(&self) -> Option<&Bytes> {
        if self.reversed {
            self.start.as_ref()
        } else {
            self.finish.as_ref()
        }
    }

    /// Returns the range as ascending byte bounds.
    pub fn bounds(&self) -> (Bound<&[u8]>, Bound<&[u8]>) {
        (included(self.lower()), included(self.upper()))
    }

    /// Rejects ranges whose finish lies before their start in scan order.
    pub fn validate(&self) -> EngineResult<()> {
        if let (Some(lower), Some(upper)) = (self.lower(), self.upper()) {
            if lower > upper {
                let order = if self.reversed { "descending" } else { "ascending" };
                return Err(EngineError::InvalidRange(format!(
                    "finish precedes start in {order} scan order"
                )));
            }
        }
        Ok(())
    }
}

fn included(name: Option<&Bytes>) -> Bound<&[u8]> {
    match name {
        Some(name) => Bound::Included(&name[..]),
        None => Bound::Unbounded,
    }
}
