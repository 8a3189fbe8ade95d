//! Mutation batches.

use bytes::Bytes;
use widerow_common::{MAX_COLUMN_NAME_SIZE, MAX_COLUMN_VALUE_SIZE, MAX_ROW_KEY_SIZE};

use crate::error::{EngineError, EngineResult};

/// One mutation intent within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Delete every column of the row.
    DeleteRow,
    /// Delete a single column.
    DeleteColumn {
        /// Encoded column name.
        name: Bytes,
    },
    /// Insert or overwrite a column.
    Insert {
        /// Encoded column name.
        name: Bytes,
        /// Encoded column value.
        value: Bytes,
        /// Engine-native ttl; `0` means no expiration.
        ttl: u32,
    },
}

/// An atomic set of mutations against one row of one column family.
///
/// Engines apply the mutations in order, so a `DeleteRow` followed by an
/// `Insert` leaves the row holding exactly the inserted columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationBatch {
    /// Target column family.
    pub column_family: String,
    /// Encoded row key.
    pub row_key: Bytes,
    /// Ordered mutation intents.
    pub mutations: Vec<Mutation>,
}

impl MutationBatch {
    /// Creates an empty batch for a row.
    pub fn new(column_family: impl Into<String>, row_key: impl Into<Bytes>) -> Self {
        Self {
            column_family: column_family.into(),
            row_key: row_key.into(),
            mutations: Vec::new(),
        }
    }

    /// Queues a whole-row delete.
    pub fn delete_row(&mut self) -> &mut Self {
        self.mutations.push(Mutation::DeleteRow);
        self
    }

    /// Queues a column delete.
    pub fn delete_column(&mut self, name: impl Into<Bytes>) -> &mut Self {
        self.mutations.push(Mutation::DeleteColumn { name: name.into() });
        self
    }

    /// Queues a column insert.
    pub fn insert(
        &mut self,
        name: impl Into<Bytes>,
        value: impl Into<Bytes>,
        ttl: u32,
    ) -> &mut Self {
        self.mutations.push(Mutation::Insert {
            name: name.into(),
            value: value.into(),
            ttl,
        });
        self
    }

    /// Returns the number of queued mutations.
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Checks key, name and value limits before anything is applied.
    pub fn validate(&self) -> EngineResult<()> {
        if self.row_key.is_empty() {
            return Err(EngineError::InvalidRequest("row key is empty".into()));
        }
        if self.row_key.len() > MAX_ROW_KEY_SIZE {
            return Err(EngineError::InvalidRequest(format!(
                "row key is {} bytes, limit is {MAX_ROW_KEY_SIZE}",
                self.row_key.len()
            )));
        }

        for mutation in &self.mutations {
            match mutation {
                Mutation::DeleteRow => {}
                Mutation::DeleteColumn { name } => validate_name(name)?,
                Mutation::Insert { name, value, .. } => {
                    validate_name(name)?;
                    if value.len() > MAX_COLUMN_VALUE_SIZE {
                        return Err(EngineError::InvalidRequest(format!(
                            "column value is {} bytes, limit is {MAX_COLUMN_VALUE_SIZE}",
                            value.len()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn validate_name(name: &Bytes) -> EngineResult<()> {
    if name.is_empty() {
        return Err(EngineError::InvalidRequest("column name is empty".into()));
    }
    if name.len() > MAX_COLUMN_NAME_SIZE {
        return Err(EngineError::InvalidRequest(format!(
            "column name is {} bytes, limit is {MAX_COLUMN_NAME_SIZE}",
            name.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let mut batch = MutationBatch::new("cf", "row");
        batch.delete_row().delete_column("a").insert("b", "v", 30);

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.mutations[0], Mutation::DeleteRow);
        assert_eq!(
            batch.mutations[1],
            Mutation::DeleteColumn {
                name: Bytes::from_static(b"a")
            }
        );
        assert_eq!(
            batch.mutations[2],
            Mutation::Insert {
                name: Bytes::from_static(b"b"),
                value: Bytes::from_static(b"v"),
                ttl: 30,
            }
        );
    }

    #[test]
    fn test_validate_rejects_empty_row_key() {
        let batch = MutationBatch::new("cf", Bytes::new());
        assert!(matches!(
            batch.validate(),
            Err(EngineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_column_name() {
        let mut batch = MutationBatch::new("cf", "row");
        batch.insert(Bytes::new(), "v", 0);
        assert!(matches!(
            batch.validate(),
            Err(EngineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_row_key() {
        let batch = MutationBatch::new("cf", vec![b'k'; MAX_ROW_KEY_SIZE + 1]);
        assert!(batch.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_drop_only() {
        let mut batch = MutationBatch::new("cf", "row");
        batch.delete_row();
        assert!(batch.validate().is_ok());
    }
}
