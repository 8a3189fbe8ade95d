//! Codecs for row keys, column names and column values.
//!
//! The engine only sees bytes. A [`Codec`] turns a caller-side value into
//! those bytes and back. Column names are ordered by the engine in byte
//! order of their encoded form, so a name codec should preserve the order
//! callers expect ([`Utf8Codec`] and [`U64Codec`] do; [`JsonCodec`] does not).

mod json;
mod primitive;

pub use json::JsonCodec;
pub use primitive::{BytesCodec, U64Codec, Utf8Codec};

use bytes::Bytes;
use thiserror::Error;

use widerow_common::ErrorCode;

/// Codec error type.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Fixed-width value with the wrong number of bytes.
    #[error("expected {expected} bytes, found {actual}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length found.
        actual: usize,
    },

    /// Bytes are not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CodecError::InvalidLength { .. } => ErrorCode::InvalidLength,
            CodecError::InvalidUtf8(_) => ErrorCode::InvalidUtf8,
            CodecError::Json(_) => ErrorCode::Json,
        }
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Converts values of one type to and from engine bytes.
pub trait Codec: Send + Sync {
    /// The caller-side type.
    type Value: Clone + Send + Sync;

    /// Encodes a value.
    fn encode(&self, value: &Self::Value) -> CodecResult<Bytes>;

    /// Decodes a value.
    fn decode(&self, bytes: &[u8]) -> CodecResult<Self::Value>;
}

/// The codecs used for row keys, column names and column values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializers<K, N, V> {
    /// Row key codec.
    pub key: K,
    /// Column name codec.
    pub name: N,
    /// Column value codec.
    pub value: V,
}

impl<K, N, V> Serializers<K, N, V> {
    /// Bundles three codecs.
    pub fn new(key: K, name: N, value: V) -> Self {
        Self { key, name, value }
    }
}

impl Serializers<Utf8Codec, Utf8Codec, Utf8Codec> {
    /// String row keys, names and values.
    pub fn strings() -> Self {
        Self::default()
    }
}
