//! Batched row mutations.

use tracing::debug;

use widerow_common::EntryColumn;
use widerow_engine::{ColumnFamilySession, MutationBatch};

use crate::codec::{Codec, Serializers};
use crate::error::{DriverError, DriverResult};
use crate::ttl::ttl_to_raw;

/// A mutation of one row: optional drop, column removals, column upserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowUpdate<K, N, V> {
    /// Row to mutate.
    pub row_key: K,
    /// Delete the whole row first.
    pub drop: bool,
    /// Columns to delete.
    pub remove: Vec<N>,
    /// Columns to upsert.
    pub insert: Vec<EntryColumn<N, V>>,
}

impl<K, N, V> RowUpdate<K, N, V> {
    /// Creates an update with no intents.
    pub fn new(row_key: K) -> Self {
        Self {
            row_key,
            drop: false,
            remove: Vec::new(),
            insert: Vec::new(),
        }
    }

    /// Deletes the whole row.
    #[must_use]
    pub fn drop_row(mut self) -> Self {
        self.drop = true;
        self
    }

    /// Deletes one column.
    #[must_use]
    pub fn remove(mut self, name: N) -> Self {
        self.remove.push(name);
        self
    }

    /// Upserts one column.
    #[must_use]
    pub fn insert(mut self, column: EntryColumn<N, V>) -> Self {
        self.insert.push(column);
        self
    }

    /// Returns true if applying the update changes nothing.
    pub fn is_empty(&self) -> bool {
        !self.drop && self.remove.is_empty() && self.insert.is_empty()
    }
}

/// Builds one atomic batch per update and submits it in one engine call.
///
/// Intents are queued as drop, then removals, then inserts. Engines apply
/// them in that order.
pub struct MutationComposer<'a, S: ?Sized, K, N, V> {
    session: &'a S,
    column_family: &'a str,
    serializers: &'a Serializers<K, N, V>,
    reject_drop_with_insert: bool,
}

impl<'a, S, K, N, V> MutationComposer<'a, S, K, N, V>
where
    S: ColumnFamilySession + ?Sized,
    K: Codec,
    N: Codec,
    V: Codec,
{
    /// Creates a composer for one column family.
    pub fn new(
        session: &'a S,
        column_family: &'a str,
        serializers: &'a Serializers<K, N, V>,
    ) -> Self {
        Self {
            session,
            column_family,
            serializers,
            reject_drop_with_insert: false,
        }
    }

    /// Fail updates that drop the row and insert columns in the same call.
    #[must_use]
    pub fn reject_drop_with_insert(mut self, reject: bool) -> Self {
        self.reject_drop_with_insert = reject;
        self
    }

    /// Builds the engine batch for `update`.
    pub fn compose(
        &self,
        update: &RowUpdate<K::Value, N::Value, V::Value>,
    ) -> DriverResult<MutationBatch> {
        if self.reject_drop_with_insert && update.drop && !update.insert.is_empty() {
            return Err(DriverError::InvalidArgument(
                "row drop combined with column inserts".to_string(),
            ));
        }

        let mut batch = MutationBatch::new(
            self.column_family,
            self.serializers.key.encode(&update.row_key)?,
        );
        if update.drop {
            batch.delete_row();
        }
        for name in &update.remove {
            batch.delete_column(self.serializers.name.encode(name)?);
        }
        for column in &update.insert {
            batch.insert(
                self.serializers.name.encode(&column.name)?,
                self.serializers.value.encode(&column.value)?,
                ttl_to_raw(column.ttl_seconds),
            );
        }
        Ok(batch)
    }

    /// Applies `update`. An update with no intents completes without an
    /// engine call.
    pub async fn submit(&self, update: &RowUpdate<K::Value, N::Value, V::Value>) -> DriverResult<()> {
        let batch = self.compose(update)?;
        if batch.is_empty() {
            debug!(column_family = self.column_family, "skipped empty update");
            return Ok(());
        }

        let mutations = batch.len();
        self.session.execute_batch(batch).await?;
        debug!(
            column_family = self.column_family,
            mutations, "submitted batch"
        );
        Ok(())
    }
}
