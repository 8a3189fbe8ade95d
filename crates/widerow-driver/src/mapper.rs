//! Raw engine columns to entries.

use widerow_common::{Entry, EntryColumn};
use widerow_engine::RawColumn;

use crate::codec::{Codec, CodecResult};
use crate::ttl::ttl_from_raw;

/// Maps raw columns to entries.
///
/// Total and order preserving: one entry per raw column, in input order.
/// The first codec failure fails the whole mapping.
#[derive(Debug)]
pub struct ResultMapper<'a, N, V> {
    names: &'a N,
    values: &'a V,
}

impl<'a, N: Codec, V: Codec> ResultMapper<'a, N, V> {
    /// Creates a mapper over a name and a value codec.
    pub fn new(names: &'a N, values: &'a V) -> Self {
        Self { names, values }
    }

    /// Maps one raw column.
    pub fn map_column(&self, raw: &RawColumn) -> CodecResult<EntryColumn<N::Value, V::Value>> {
        Ok(EntryColumn {
            name: self.names.decode(&raw.name)?,
            value: self.values.decode(&raw.value)?,
            ttl_seconds: ttl_from_raw(raw.ttl),
        })
    }

    /// Maps the columns of one row.
    pub fn map<K: Clone>(
        &self,
        row_key: &K,
        columns: &[RawColumn],
    ) -> CodecResult<Vec<Entry<K, N::Value, V::Value>>> {
        columns
            .iter()
            .map(|raw| {
                Ok(Entry {
                    row_key: row_key.clone(),
                    column: self.map_column(raw)?,
                })
            })
            .collect()
    }
}
