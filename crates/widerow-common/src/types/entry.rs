//! Wide-row entries.
//!
//! An [`Entry`] is one column of one row as seen by a caller. Entries are
//! produced by the read path only; writes take [`EntryColumn`]s directly.

use serde::{Deserialize, Serialize};

/// A single column: name, value and optional time-to-live.
///
/// `ttl_seconds` of `None` means the column does not expire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryColumn<N, V> {
    /// Column name. Columns of a row are ordered by name.
    pub name: N,
    /// Column value.
    pub value: V,
    /// Seconds until the engine expires the column.
    pub ttl_seconds: Option<u32>,
}

impl<N, V> EntryColumn<N, V> {
    /// Creates a column that does not expire.
    #[inline]
    pub fn new(name: impl Into<N>, value: impl Into<V>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ttl_seconds: None,
        }
    }

    /// Sets the time-to-live in seconds.
    #[inline]
    #[must_use]
    pub fn with_ttl(mut self, ttl_seconds: u32) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }

    /// Returns true if the column carries an expiration.
    #[inline]
    #[must_use]
    pub const fn expires(&self) -> bool {
        self.ttl_seconds.is_some()
    }
}

/// One column within a specific row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry<K, N, V> {
    /// Key of the row the column belongs to.
    pub row_key: K,
    /// The column itself.
    pub column: EntryColumn<N, V>,
}

impl<K, N, V> Entry<K, N, V> {
    /// Creates an entry.
    #[inline]
    pub fn new(row_key: impl Into<K>, column: EntryColumn<N, V>) -> Self {
        Self {
            row_key: row_key.into(),
            column,
        }
    }

    /// Returns the column name.
    #[inline]
    pub const fn name(&self) -> &N {
        &self.column.name
    }

    /// Returns the column value.
    #[inline]
    pub const fn value(&self) -> &V {
        &self.column.value
    }

    /// Returns the time-to-live, if any.
    #[inline]
    #[must_use]
    pub const fn ttl_seconds(&self) -> Option<u32> {
        self.column.ttl_seconds
    }

    /// Consumes the entry, returning the column.
    #[inline]
    pub fn into_column(self) -> EntryColumn<N, V> {
        self.column
    }
}
