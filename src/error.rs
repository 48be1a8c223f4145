//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.
//!
//! Cache-internal errors never cross the crate boundary as exceptions:
//! the cache store swallows them and surfaces misses (`None`), `false`
//! return values, or zero counts instead. The variants exist so internal
//! layers can tell failure modes apart when logging. The single
//! exception is `memoize`, which passes its producer's own error through
//! untouched because that is an upstream failure, not a cache failure.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache-internal failures.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Storage backend refused the write (quota exceeded, disabled store)
    #[error("storage write failed for key '{key}': {reason}")]
    WriteFailed { key: String, reason: String },

    /// Stored entry could not be decoded (malformed JSON, bad base64)
    #[error("corrupted cache entry: {0}")]
    Corrupted(String),

    /// Entry serialization failed before the write
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for cache-internal operations.
pub type Result<T> = std::result::Result<T, CacheError>;
