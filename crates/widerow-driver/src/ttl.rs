//! Conversion between optional ttls and the engine's integer ttl.
//!
//! The engine writes `0` for "does not expire". These two functions are the
//! only places that sentinel is produced or interpreted.

use widerow_engine::NO_TTL;

/// Engine ttl to caller ttl: `0` becomes `None`.
#[inline]
pub fn ttl_from_raw(raw: u32) -> Option<u32> {
    (raw != NO_TTL).then_some(raw)
}

/// Caller ttl to engine ttl: `None` becomes `0`.
#[inline]
pub fn ttl_to_raw(ttl_seconds: Option<u32>) -> u32 {
    ttl_seconds.unwrap_or(NO_TTL)
}
