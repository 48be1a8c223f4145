//! Cache Statistics Module
//!
//! Full-scan entry classification per backend, plus lightweight
//! hit/miss counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Backend Report ==
/// Scan summary for a single backend.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BackendReport {
    /// Number of cache-owned entries present
    pub total: usize,
    /// How many of them are expired or unreadable
    pub expired: usize,
    /// Estimated storage footprint in bytes (two bytes per character,
    /// matching the UTF-16 accounting browser quotas use)
    pub size_bytes: usize,
}

// == Cache Stats ==
/// Full-scan classification of every cache-owned entry, per backend.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CacheStats {
    pub durable: BackendReport,
    pub ephemeral: BackendReport,
}

impl CacheStats {
    /// Entries across both backends.
    pub fn total_entries(&self) -> usize {
        self.durable.total + self.ephemeral.total
    }

    /// Expired or unreadable entries across both backends.
    pub fn total_expired(&self) -> usize {
        self.durable.expired + self.ephemeral.expired
    }

    /// Estimated footprint across both backends.
    pub fn size_bytes(&self) -> usize {
        self.durable.size_bytes + self.ephemeral.size_bytes
    }
}

// == Access Stats ==
/// Hit/miss/write counters, updated on the read and write paths.
///
/// Atomics so the store stays usable behind a shared reference. Purely
/// observational; no cache behavior depends on these.
#[derive(Debug, Default)]
pub struct AccessStats {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
}

/// Point-in-time copy of the access counters.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AccessSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    /// hits / (hits + misses), 0.0 when no reads have happened
    pub hit_rate: f64,
}

impl AccessStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> AccessSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        AccessSnapshot {
            hits,
            misses,
            writes: self.writes.load(Ordering::Relaxed),
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_totals() {
        let stats = CacheStats {
            durable: BackendReport {
                total: 3,
                expired: 1,
                size_bytes: 100,
            },
            ephemeral: BackendReport {
                total: 2,
                expired: 2,
                size_bytes: 50,
            },
        };

        assert_eq!(stats.total_entries(), 5);
        assert_eq!(stats.total_expired(), 3);
        assert_eq!(stats.size_bytes(), 150);
    }

    #[test]
    fn test_access_stats_start_at_zero() {
        let snapshot = AccessStats::new().snapshot();
        assert_eq!(snapshot.hits, 0);
        assert_eq!(snapshot.misses, 0);
        assert_eq!(snapshot.writes, 0);
        assert_eq!(snapshot.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = AccessStats::new();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.snapshot().hit_rate, 0.5);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let stats = AccessStats::new();
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.snapshot().hit_rate, 1.0);
    }

    #[test]
    fn test_writes_tracked_separately() {
        let stats = AccessStats::new();
        stats.record_write();
        stats.record_write();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.writes, 2);
        assert_eq!(snapshot.hit_rate, 0.0);
    }
}
