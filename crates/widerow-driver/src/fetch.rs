//! Range reads.

use tracing::debug;

use widerow_common::{Entry, DEFAULT_FETCH_LIMIT};
use widerow_engine::{ColumnFamilySession, SliceRange};

use crate::codec::{Codec, CodecResult, Serializers};
use crate::error::DriverResult;
use crate::mapper::ResultMapper;

/// A directional, optionally bounded, count-limited selection of columns.
///
/// `from` and `to` are inclusive and expressed in the caller's direction:
/// when descending, `from` is the highest name and `to` the lowest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRange<N> {
    /// Scan in ascending name order.
    pub ascending: bool,
    /// First name to return.
    pub from: Option<N>,
    /// Last name to return.
    pub to: Option<N>,
    /// Maximum number of entries.
    pub limit: u32,
}

impl<N> Default for ColumnRange<N> {
    fn default() -> Self {
        Self::ascending(DEFAULT_FETCH_LIMIT)
    }
}

impl<N> ColumnRange<N> {
    /// Unbounded ascending range.
    pub fn ascending(limit: u32) -> Self {
        Self {
            ascending: true,
            from: None,
            to: None,
            limit,
        }
    }

    /// Unbounded descending range.
    pub fn descending(limit: u32) -> Self {
        Self {
            ascending: false,
            ..Self::ascending(limit)
        }
    }

    /// Sets the first name to return.
    #[must_use]
    pub fn from(mut self, name: N) -> Self {
        self.from = Some(name);
        self
    }

    /// Sets the last name to return.
    #[must_use]
    pub fn to(mut self, name: N) -> Self {
        self.to = Some(name);
        self
    }
}

/// Issues one slice read per call and maps the result.
///
/// No pagination: if more columns match than `limit`, only the first
/// `limit` in scan order are returned.
pub struct RangeFetcher<'a, S: ?Sized, K, N, V> {
    session: &'a S,
    column_family: &'a str,
    serializers: &'a Serializers<K, N, V>,
}

impl<'a, S, K, N, V> RangeFetcher<'a, S, K, N, V>
where
    S: ColumnFamilySession + ?Sized,
    K: Codec,
    N: Codec,
    V: Codec,
{
    /// Creates a fetcher for one column family.
    pub fn new(
        session: &'a S,
        column_family: &'a str,
        serializers: &'a Serializers<K, N, V>,
    ) -> Self {
        Self {
            session,
            column_family,
            serializers,
        }
    }

    /// Builds the engine range for `range`.
    ///
    /// The engine's `start` is where the scan begins, so the caller's `from`
    /// maps to `start` in both directions.
    pub fn slice_range(&self, range: &ColumnRange<N::Value>) -> CodecResult<SliceRange> {
        let mut slice = SliceRange::new(!range.ascending, range.limit);
        if let Some(from) = &range.from {
            slice.start = Some(self.serializers.name.encode(from)?);
        }
        if let Some(to) = &range.to {
            slice.finish = Some(self.serializers.name.encode(to)?);
        }
        Ok(slice)
    }

    /// Reads the columns of `row_key` selected by `range`.
    pub async fn fetch(
        &self,
        row_key: &K::Value,
        range: &ColumnRange<N::Value>,
    ) -> DriverResult<Vec<Entry<K::Value, N::Value, V::Value>>> {
        let key = self.serializers.key.encode(row_key)?;
        let slice = self.slice_range(range)?;

        let columns = self
            .session
            .get_slice(self.column_family, key, slice)
            .await?;
        debug!(
            column_family = self.column_family,
            ascending = range.ascending,
            limit = range.limit,
            returned = columns.len(),
            "fetched slice"
        );

        let mapper = ResultMapper::new(&self.serializers.name, &self.serializers.value);
        Ok(mapper.map(row_key, &columns)?)
    }
}
