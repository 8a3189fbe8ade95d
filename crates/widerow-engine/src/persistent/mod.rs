//! Persistent column-family engine backed by a fjall keyspace.
//!
//! Each column family is one partition. Columns of a row are stored under a
//! length-prefixed row key (see [`format`]), so a slice read is one range
//! scan and a whole-row delete is one prefix scan.

mod format;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Bound;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use parking_lot::Mutex;
use tracing::{debug, info};

use widerow_common::{ConfigError, EngineConfig};

use self::format::{column_key, prefix_successor, row_prefix, StoredValue};
use crate::error::{EngineError, EngineResult};
use crate::mutation::{Mutation, MutationBatch};
use crate::slice::{RawColumn, SliceRange};
use crate::{ColumnFamilySession, EngineFuture};

/// Persistent column-family engine.
///
/// Cloning is cheap; clones share the keyspace.
#[derive(Clone)]
pub struct FjallEngine {
    inner: Arc<FjallInner>,
}

struct FjallInner {
    keyspace: Keyspace,
    partitions: HashMap<String, PartitionHandle>,
    sync_on_commit: bool,
    /// Serializes writers so a row delete sees every column it must remove.
    write_lock: Mutex<()>,
}

impl fmt::Debug for FjallEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FjallEngine")
            .field("column_families", &self.column_families())
            .field("sync_on_commit", &self.inner.sync_on_commit)
            .finish_non_exhaustive()
    }
}

impl FjallEngine {
    /// Opens (or creates) the keyspace in `config.data_dir` with one
    /// partition per configured column family.
    pub fn open(config: &EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        if config.memory_mode {
            return Err(ConfigError::Invalid {
                field: "memory_mode",
                message: "the persistent engine needs a data directory".to_string(),
            }
            .into());
        }

        std::fs::create_dir_all(&config.data_dir)?;
        let keyspace = fjall::Config::new(&config.data_dir).open()?;

        let mut partitions = HashMap::with_capacity(config.column_families.len());
        for name in &config.column_families {
            let partition = keyspace.open_partition(name, PartitionCreateOptions::default())?;
            partitions.insert(name.clone(), partition);
        }

        info!(
            data_dir = %config.data_dir.display(),
            column_families = partitions.len(),
            "opened persistent engine"
        );

        Ok(Self {
            inner: Arc::new(FjallInner {
                keyspace,
                partitions,
                sync_on_commit: config.sync_on_commit,
                write_lock: Mutex::new(()),
            }),
        })
    }

    /// Lists column family names in sorted order.
    pub fn column_families(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.partitions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Flushes the journal to disk.
    pub fn persist(&self) -> EngineResult<()> {
        self.inner.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

impl FjallInner {
    fn partition(&self, column_family: &str) -> EngineResult<&PartitionHandle> {
        self.partitions
            .get(column_family)
            .ok_or_else(|| EngineError::ColumnFamilyNotFound(column_family.to_string()))
    }

    fn read_slice(
        &self,
        column_family: &str,
        row_key: &[u8],
        range: &SliceRange,
        now: u64,
    ) -> EngineResult<Vec<RawColumn>> {
        range.validate()?;
        let partition = self.partition(column_family)?;
        let prefix = row_prefix(row_key)?;

        let lower = match range.lower() {
            Some(name) => Bound::Included(column_key(&prefix, name)),
            None => Bound::Included(prefix.clone()),
        };
        let upper = match range.upper() {
            Some(name) => Bound::Included(column_key(&prefix, name)),
            None => prefix_successor(&prefix).map_or(Bound::Unbounded, Bound::Excluded),
        };

        let scan = partition.range((lower, upper));
        let scan: Box<dyn Iterator<Item = fjall::Result<fjall::KvPair>> + '_> = if range.reversed {
            Box::new(scan.rev())
        } else {
            Box::new(scan)
        };

        let count = range.count as usize;
        let mut columns = Vec::with_capacity(count.min(64));
        for item in scan {
            if columns.len() >= count {
                break;
            }
            let (key, value) = item?;
            let stored = StoredValue::decode(&value)?;
            if stored.is_expired(now) {
                continue;
            }
            let name = Bytes::copy_from_slice(&key[prefix.len()..]);
            columns.push(RawColumn::new(name, stored.value, stored.ttl));
        }
        Ok(columns)
    }

    fn write_batch(&self, batch: MutationBatch, now: u64) -> EngineResult<()> {
        batch.validate()?;
        let partition = self.partition(&batch.column_family)?;
        let prefix = row_prefix(&batch.row_key)?;

        let _guard = self.write_lock.lock();

        // Final effect per storage key: Some(value) to write, None to remove.
        let mut effects: BTreeMap<Vec<u8>, Option<Vec<u8>>> = BTreeMap::new();
        for mutation in &batch.mutations {
            match mutation {
                Mutation::DeleteRow => {
                    for effect in effects.values_mut() {
                        *effect = None;
                    }
                    for item in partition.prefix(&prefix) {
                        let (key, _) = item?;
                        effects.insert(key.to_vec(), None);
                    }
                }
                Mutation::DeleteColumn { name } => {
                    effects.insert(column_key(&prefix, name), None);
                }
                Mutation::Insert { name, value, ttl } => {
                    effects.insert(
                        column_key(&prefix, name),
                        Some(StoredValue::encode(value, *ttl, now)),
                    );
                }
            }
        }

        let mut writes = self.keyspace.batch();
        for (key, effect) in &effects {
            match effect {
                Some(value) => writes.insert(partition, key.as_slice(), value.as_slice()),
                None => writes.remove(partition, key.as_slice()),
            }
        }
        writes.commit()?;

        if self.sync_on_commit {
            self.keyspace.persist(PersistMode::SyncAll)?;
        }

        debug!(
            column_family = %batch.column_family,
            mutations = batch.mutations.len(),
            keys = effects.len(),
            "committed fjall batch"
        );
        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

impl ColumnFamilySession for FjallEngine {
    fn get_slice<'a>(
        &'a self,
        column_family: &'a str,
        row_key: Bytes,
        range: SliceRange,
    ) -> EngineFuture<'a, Vec<RawColumn>> {
        let inner = Arc::clone(&self.inner);
        let column_family = column_family.to_string();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                inner.read_slice(&column_family, &row_key, &range, unix_now())
            })
            .await?
        })
    }

    fn execute_batch(&self, batch: MutationBatch) -> EngineFuture<'_, ()> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || inner.write_batch(batch, unix_now())).await?
        })
    }
}
