//! Cache Module
//!
//! TTL key-value engine over the storage adapter: entry metadata, the
//! entry codec, the store itself, and full-scan statistics.

mod codec;
mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use codec::{decode, encode};
pub use entry::{current_timestamp_ms, CacheEntry};
pub use stats::{AccessSnapshot, BackendReport, CacheStats};
pub use store::{CacheStore, SetOptions};

// == Public Constants ==
/// Prefix carried by every cache-owned storage key.
///
/// Distinguishes cache slots from unrelated application keys sharing the
/// same storage backend. No other consumer should write under it.
pub const CACHE_PREFIX: &str = "cache_";

/// Serialized payload size in bytes above which an opted-in write is
/// base64-wrapped.
pub const COMPRESSION_THRESHOLD: usize = 1024;
