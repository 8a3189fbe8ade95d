//! System-wide constants for widerow.

// =============================================================================
// Key and Value Limits
// =============================================================================

/// Maximum row key size in bytes.
///
/// The persistent engine stores the row key length as a big-endian `u16`.
pub const MAX_ROW_KEY_SIZE: usize = u16::MAX as usize;

/// Maximum column name size in bytes (64 KB).
pub const MAX_COLUMN_NAME_SIZE: usize = 64 * 1024;

/// Maximum column value size in bytes (16 MB).
pub const MAX_COLUMN_VALUE_SIZE: usize = 16 * 1024 * 1024;

// =============================================================================
// Driver Defaults
// =============================================================================

/// Column family used when none is configured.
pub const DEFAULT_COLUMN_FAMILY: &str = "default";

/// Default slow-operation threshold for timing instrumentation (ms).
pub const DEFAULT_SLOW_OPERATION_THRESHOLD_MS: u64 = 500;

/// Default number of columns returned by the command-line `get`.
pub const DEFAULT_FETCH_LIMIT: u32 = 100;

// =============================================================================
// Operation Names
// =============================================================================

/// Operation name reported to instrumentation for range reads.
pub const OP_FETCH_DATA: &str = "fetch_data";

/// Operation name reported to instrumentation for batched writes.
pub const OP_UPDATE: &str = "update";
