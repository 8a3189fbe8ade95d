use bytes::Bytes;

use super::{Codec, CodecError, CodecResult};

/// Passes bytes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl Codec for BytesCodec {
    type Value = Bytes;

    fn encode(&self, value: &Bytes) -> CodecResult<Bytes> {
        Ok(value.clone())
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Bytes> {
        Ok(Bytes::copy_from_slice(bytes))
    }
}

/// UTF-8 strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Codec;

impl Codec for Utf8Codec {
    type Value = String;

    fn encode(&self, value: &String) -> CodecResult<Bytes> {
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<String> {
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }
}

/// Unsigned integers as 8 big-endian bytes, so byte order is numeric order.
#[derive(Debug, Clone, Copy, Default)]
pub struct U64Codec;

impl Codec for U64Codec {
    type Value = u64;

    fn encode(&self, value: &u64) -> CodecResult<Bytes> {
        Ok(Bytes::copy_from_slice(&value.to_be_bytes()))
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<u64> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| CodecError::InvalidLength {
            expected: 8,
            actual: bytes.len(),
        })?;
        Ok(u64::from_be_bytes(raw))
    }
}
