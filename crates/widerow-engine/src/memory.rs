//! In-memory column-family engine.
//!
//! Rows live in ordered maps guarded by a single reader-writer lock, so a
//! batch is applied under one write guard and is never partially visible.
//! Expiry uses [`tokio::time::Instant`], which lets tests pause and advance
//! the clock.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use bytes::Bytes;
use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::debug;

use widerow_common::EngineConfig;

use crate::error::{EngineError, EngineResult};
use crate::mutation::{Mutation, MutationBatch};
use crate::slice::{RawColumn, SliceRange, NO_TTL};
use crate::{ColumnFamilySession, EngineFuture};

/// A stored column.
#[derive(Debug, Clone)]
struct StoredColumn {
    value: Bytes,
    ttl: u32,
    expires_at: Option<Instant>,
}

impl StoredColumn {
    fn new(value: Bytes, ttl: u32, now: Instant) -> Self {
        let expires_at = (ttl != NO_TTL).then(|| now + Duration::from_secs(u64::from(ttl)));
        Self {
            value,
            ttl,
            expires_at,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    fn to_raw(&self, name: &Bytes) -> RawColumn {
        RawColumn::new(name.clone(), self.value.clone(), self.ttl)
    }
}

type Row = BTreeMap<Bytes, StoredColumn>;
type Family = BTreeMap<Bytes, Row>;

/// In-memory column-family engine.
///
/// # Example
///
/// ```rust,ignore
/// let engine = MemoryEngine::with_column_families(["users"]);
/// let mut batch = MutationBatch::new("users", "alice");
/// batch.insert("email", "alice@example.com", 0);
/// engine.execute_batch(batch).await?;
/// ```
#[derive(Debug, Default)]
pub struct MemoryEngine {
    families: RwLock<HashMap<String, Family>>,
}

impl MemoryEngine {
    /// Creates an engine with no column families.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given column families.
    pub fn with_column_families<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let engine = Self::new();
        for name in names {
            engine.create_column_family(name);
        }
        engine
    }

    /// Creates an engine with the column families of `config`.
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::with_column_families(config.column_families.iter().cloned()))
    }

    /// Creates a column family. Returns false if it already existed.
    pub fn create_column_family(&self, name: impl Into<String>) -> bool {
        let mut families = self.families.write();
        let name = name.into();
        if families.contains_key(&name) {
            return false;
        }
        families.insert(name, Family::new());
        true
    }

    /// Returns true if the column family exists.
    pub fn has_column_family(&self, name: &str) -> bool {
        self.families.read().contains_key(name)
    }

    /// Lists column family names in sorted order.
    pub fn column_families(&self) -> Vec<String> {
        let mut names: Vec<String> = self.families.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of rows holding at least one column, expired
    /// columns included until they are purged.
    pub fn row_count(&self, column_family: &str) -> EngineResult<usize> {
        let families = self.families.read();
        let family = families
            .get(column_family)
            .ok_or_else(|| EngineError::ColumnFamilyNotFound(column_family.to_string()))?;
        Ok(family.len())
    }

    fn read_slice(
        &self,
        column_family: &str,
        row_key: &[u8],
        range: &SliceRange,
    ) -> EngineResult<Vec<RawColumn>> {
        range.validate()?;

        let families = self.families.read();
        let family = families
            .get(column_family)
            .ok_or_else(|| EngineError::ColumnFamilyNotFound(column_family.to_string()))?;
        let Some(row) = family.get(row_key) else {
            return Ok(Vec::new());
        };

        let now = Instant::now();
        let count = range.count as usize;
        let selected = row.range::<[u8], _>(range.bounds());
        let columns = if range.reversed {
            selected
                .rev()
                .filter(|(_, column)| !column.is_expired(now))
                .take(count)
                .map(|(name, column)| column.to_raw(name))
                .collect()
        } else {
            selected
                .filter(|(_, column)| !column.is_expired(now))
                .take(count)
                .map(|(name, column)| column.to_raw(name))
                .collect()
        };
        Ok(columns)
    }

    fn apply_batch(&self, batch: MutationBatch) -> EngineResult<()> {
        batch.validate()?;

        let mut families = self.families.write();
        let family = families
            .get_mut(&batch.column_family)
            .ok_or_else(|| EngineError::ColumnFamilyNotFound(batch.column_family.clone()))?;

        let now = Instant::now();
        let mut row = family.remove(&batch.row_key).unwrap_or_default();
        row.retain(|_, column| !column.is_expired(now));

        let applied = batch.mutations.len();
        for mutation in batch.mutations {
            match mutation {
                Mutation::DeleteRow => row.clear(),
                Mutation::DeleteColumn { name } => {
                    row.remove(&name);
                }
                Mutation::Insert { name, value, ttl } => {
                    row.insert(name, StoredColumn::new(value, ttl, now));
                }
            }
        }

        debug!(
            column_family = %batch.column_family,
            mutations = applied,
            columns = row.len(),
            "applied memory batch"
        );

        if !row.is_empty() {
            family.insert(batch.row_key, row);
        }
        Ok(())
    }
}

impl ColumnFamilySession for MemoryEngine {
    fn get_slice<'a>(
        &'a self,
        column_family: &'a str,
        row_key: Bytes,
        range: SliceRange,
    ) -> EngineFuture<'a, Vec<RawColumn>> {
        Box::pin(async move { self.read_slice(column_family, &row_key, &range) })
    }

    fn execute_batch(&self, batch: MutationBatch) -> EngineFuture<'_, ()> {
        Box::pin(async move { self.apply_batch(batch) })
    }
}
