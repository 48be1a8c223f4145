//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached payload together with its expiration metadata.
///
/// An entry is either live or expired; expired entries are logically
/// absent and every read path treats them as a miss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Entry lifetime in seconds
    pub ttl_seconds: u64,
    /// Whether `data` was base64-wrapped by the codec
    #[serde(default)]
    pub compressed: bool,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(data: T, ttl_seconds: u64) -> Self {
        Self {
            data,
            created_at: current_timestamp_ms(),
            ttl_seconds,
            compressed: false,
        }
    }

    /// Absolute expiration timestamp (Unix milliseconds).
    pub fn expires_at(&self) -> u64 {
        self.created_at + self.ttl_seconds * 1000
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: expiration is a strict comparison. An entry
    /// written with a 1 second TTL is still live at exactly
    /// `created_at + 1000` ms and expired one millisecond later.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiration check against an explicit clock reading.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at()
    }

    // == Time To Live ==
    /// Remaining lifetime in whole seconds (floor). Zero at the
    /// expiration boundary, negative once expired.
    pub fn ttl_remaining(&self) -> i64 {
        let now = current_timestamp_ms() as i64;
        (self.expires_at() as i64 - now).div_euclid(1000)
    }

    /// Age of the entry in whole seconds.
    pub fn age_seconds(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.created_at) / 1000
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
