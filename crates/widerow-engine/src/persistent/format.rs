//! On-disk layout of the persistent engine.
//!
//! ```text
//! key:   +-----------------+-----------+--------------+
//!        | row key len (2) | row key   | column name  |
//!        +-----------------+-----------+--------------+
//! value: +-----------------+-----------+--------------+
//!        | expires at (8)  | ttl (4)   | column value |
//!        +-----------------+-----------+--------------+
//! ```
//!
//! Integers are big-endian. The length prefix keeps one row's columns
//! contiguous and sorted by name; `expires at` is unix seconds, `0` = never.

use bytes::{BufMut, Bytes, BytesMut};
use widerow_common::MAX_ROW_KEY_SIZE;

use crate::error::{EngineError, EngineResult};
use crate::slice::NO_TTL;

/// Size of the stored value header.
pub(crate) const VALUE_HEADER_SIZE: usize = 8 + 4;

/// Encodes the key prefix shared by every column of a row.
pub(crate) fn row_prefix(row_key: &[u8]) -> EngineResult<Vec<u8>> {
    let len = u16::try_from(row_key.len()).map_err(|_| {
        EngineError::InvalidRequest(format!(
            "row key is {} bytes, limit is {MAX_ROW_KEY_SIZE}",
            row_key.len()
        ))
    })?;
    let mut prefix = Vec::with_capacity(2 + row_key.len());
    prefix.extend_from_slice(&len.to_be_bytes());
    prefix.extend_from_slice(row_key);
    Ok(prefix)
}

/// Encodes the storage key of one column.
pub(crate) fn column_key(prefix: &[u8], name: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + name.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(name);
    key
}

/// Returns the smallest key greater than every key starting with `prefix`.
pub(crate) fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let last = prefix.iter().rposition(|&b| b != u8::MAX)?;
    let mut successor = prefix[..=last].to_vec();
    successor[last] += 1;
    Some(successor)
}

/// A decoded column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredValue {
    pub expires_at: u64,
    pub ttl: u32,
    pub value: Bytes,
}

impl StoredValue {
    /// Encodes a value written at `now` (unix seconds).
    pub fn encode(value: &[u8], ttl: u32, now: u64) -> Vec<u8> {
        let expires_at = if ttl == NO_TTL {
            0
        } else {
            now.saturating_add(u64::from(ttl))
        };
        let mut buf = BytesMut::with_capacity(VALUE_HEADER_SIZE + value.len());
        buf.put_u64(expires_at);
        buf.put_u32(ttl);
        buf.put_slice(value);
        buf.to_vec()
    }

    pub fn decode(bytes: &[u8]) -> EngineResult<Self> {
        if bytes.len() < VALUE_HEADER_SIZE {
            return Err(EngineError::Corrupted(format!(
                "value is {} bytes, header needs {VALUE_HEADER_SIZE}",
                bytes.len()
            )));
        }
        let (expires_at, rest) = bytes.split_at(8);
        let (ttl, value) = rest.split_at(4);
        Ok(Self {
            expires_at: u64::from_be_bytes(expires_at.try_into().unwrap_or_default()),
            ttl: u32::from_be_bytes(ttl.try_into().unwrap_or_default()),
            value: Bytes::copy_from_slice(value),
        })
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at != 0 && now >= self.expires_at
    }
}
