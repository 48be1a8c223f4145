//! Cache Store Module
//!
//! The TTL key-value engine: reads and writes entries through the
//! storage adapter and the entry codec, with lazy deletion of expired
//! and corrupted entries.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::stats::AccessStats;
use super::{codec, AccessSnapshot, BackendReport, CacheEntry, CacheStats, CACHE_PREFIX};
use crate::config::CacheConfig;
use crate::storage::{Backend, StorageAdapter};

// == Set Options ==
/// Per-write options for [`CacheStore::set`] and [`CacheStore::memoize`].
#[derive(Debug, Clone)]
pub struct SetOptions {
    /// Entry lifetime in seconds. Zero is not a valid lifetime and falls
    /// back to the configured default.
    pub ttl_seconds: u64,
    /// Which backend receives the entry
    pub backend: Backend,
    /// Base64-wrap large payloads
    pub compress: bool,
}

impl Default for SetOptions {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            backend: Backend::Durable,
            compress: false,
        }
    }
}

impl SetOptions {
    /// Options with an explicit TTL and the remaining defaults.
    pub fn ttl(ttl_seconds: u64) -> Self {
        Self {
            ttl_seconds,
            ..Self::default()
        }
    }
}

// == Cache Store ==
/// TTL cache over two key-value backends.
///
/// All operations are synchronous and infallible from the caller's point
/// of view: storage and decode failures are logged and surfaced as
/// misses, `false`, or zero counts. The only async operation is
/// [`memoize`](CacheStore::memoize), whose sole suspension point is the
/// awaited producer.
///
/// Two racing `memoize` calls for the same key may both miss and both
/// invoke their producer, with the last write winning. The backends have
/// no compare-and-swap primitive, so no at-most-once guarantee is made.
pub struct CacheStore {
    /// Backend routing
    storage: StorageAdapter,
    /// Shared configuration (default TTL)
    config: CacheConfig,
    /// Hit/miss/write counters
    access: AccessStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store over the given adapter and configuration.
    pub fn new(storage: StorageAdapter, config: CacheConfig) -> Self {
        Self {
            storage,
            config,
            access: AccessStats::new(),
        }
    }

    /// Store with both backends in memory and default configuration.
    pub fn in_memory() -> Self {
        Self::new(StorageAdapter::in_memory(), CacheConfig::default())
    }

    /// Prefixes a caller key into the cache namespace. Keys that already
    /// carry the prefix pass through unchanged.
    fn storage_key(key: &str) -> String {
        if key.starts_with(CACHE_PREFIX) {
            key.to_string()
        } else {
            format!("{CACHE_PREFIX}{key}")
        }
    }

    // == Set ==
    /// Stores a value under the key, overwriting any previous entry.
    ///
    /// Returns whether the write landed. Failures (quota, serialization)
    /// are logged and reported as `false`; caching is best-effort and a
    /// failed write must never break the caller.
    pub fn set<T: Serialize>(&self, key: &str, data: &T, opts: &SetOptions) -> bool {
        let ttl = if opts.ttl_seconds == 0 {
            self.config.default_ttl_seconds
        } else {
            opts.ttl_seconds
        };
        let entry = CacheEntry::new(data, ttl);

        let raw = match codec::encode(&entry, opts.compress) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "failed to encode cache entry");
                return false;
            }
        };

        match self.storage.write(opts.backend, &Self::storage_key(key), &raw) {
            Ok(()) => {
                self.access.record_write();
                true
            }
            Err(e) => {
                warn!(key, backend = %opts.backend, error = %e, "cache write failed");
                false
            }
        }
    }

    // == Get ==
    /// Retrieves a live value, or None on miss.
    ///
    /// Expired and corrupted entries are deleted on discovery (lazy
    /// deletion) and read as misses.
    pub fn get<T: DeserializeOwned>(&self, key: &str, backend: Backend) -> Option<T> {
        let skey = Self::storage_key(key);
        let Some(raw) = self.storage.read(backend, &skey) else {
            self.access.record_miss();
            return None;
        };

        match codec::decode::<T>(&raw) {
            Err(e) => {
                debug!(key, backend = %backend, error = %e, "removing corrupted cache entry");
                self.storage.remove(backend, &skey);
                self.access.record_miss();
                None
            }
            Ok(entry) if entry.is_expired() => {
                self.storage.remove(backend, &skey);
                self.access.record_miss();
                None
            }
            Ok(entry) => {
                self.access.record_hit();
                Some(entry.data)
            }
        }
    }

    // == Delete ==
    /// Removes an entry. Returns whether a stored value was present.
    pub fn delete(&self, key: &str, backend: Backend) -> bool {
        let skey = Self::storage_key(key);
        let existed = self.storage.read(backend, &skey).is_some();
        if existed {
            self.storage.remove(backend, &skey);
        }
        existed
    }

    // == Exists ==
    /// True iff a live, decodable entry is present.
    ///
    /// Unlike [`get`](CacheStore::get), this never mutates state: an
    /// expired or corrupted entry is left in place for the next read or
    /// cleanup pass to collect.
    pub fn exists(&self, key: &str, backend: Backend) -> bool {
        self.live_entry(key, backend).is_some()
    }

    // == TTL Remaining ==
    /// Remaining lifetime in whole seconds.
    ///
    /// Returns `-2` when the key is absent, expired, or corrupted
    /// (Redis sentinel convention).
    pub fn ttl_remaining(&self, key: &str, backend: Backend) -> i64 {
        match self.live_entry(key, backend) {
            Some(entry) => entry.ttl_remaining().max(0),
            None => -2,
        }
    }

    /// Non-mutating read of a live entry's metadata.
    fn live_entry(&self, key: &str, backend: Backend) -> Option<CacheEntry<serde_json::Value>> {
        let raw = self.storage.read(backend, &Self::storage_key(key))?;
        let entry = codec::decode::<serde_json::Value>(&raw).ok()?;
        if entry.is_expired() {
            None
        } else {
            Some(entry)
        }
    }

    // == Clear ==
    /// Removes every cache-owned key from one backend, or from both when
    /// `backend` is None. Returns the number of entries removed.
    pub fn clear(&self, backend: Option<Backend>) -> usize {
        let targets: &[Backend] = match backend {
            Some(ref b) => std::slice::from_ref(b),
            None => &Backend::ALL,
        };

        let mut removed = 0;
        for &target in targets {
            for key in self.cache_keys(target) {
                self.storage.remove(target, &key);
                removed += 1;
            }
        }
        removed
    }

    // == Clean Expired ==
    /// Full scan of both backends removing expired and corrupted
    /// entries. Returns the number removed.
    ///
    /// This is the basis for periodic maintenance; the read path only
    /// ever cleans the keys it happens to touch.
    pub fn clean_expired(&self) -> usize {
        let mut removed = 0;
        for backend in Backend::ALL {
            for key in self.cache_keys(backend) {
                let Some(raw) = self.storage.read(backend, &key) else {
                    continue;
                };
                let stale = match codec::decode::<serde_json::Value>(&raw) {
                    Ok(entry) => entry.is_expired(),
                    Err(_) => true,
                };
                if stale {
                    self.storage.remove(backend, &key);
                    removed += 1;
                }
            }
        }
        if removed > 0 {
            debug!(removed, "cleaned expired cache entries");
        }
        removed
    }

    // == Stats ==
    /// Full-scan classification of every cache-owned entry.
    ///
    /// Corrupted entries count toward `expired`: both are removed by the
    /// same cleanup pass.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            durable: self.backend_report(Backend::Durable),
            ephemeral: self.backend_report(Backend::Ephemeral),
        }
    }

    fn backend_report(&self, backend: Backend) -> BackendReport {
        let mut report = BackendReport::default();
        for key in self.cache_keys(backend) {
            let Some(raw) = self.storage.read(backend, &key) else {
                continue;
            };
            report.total += 1;
            report.size_bytes += raw.chars().count() * 2;
            let stale = match codec::decode::<serde_json::Value>(&raw) {
                Ok(entry) => entry.is_expired(),
                Err(_) => true,
            };
            if stale {
                report.expired += 1;
            }
        }
        report
    }

    /// Snapshot of the hit/miss/write counters.
    pub fn access_stats(&self) -> AccessSnapshot {
        self.access.snapshot()
    }

    // == Memoize ==
    /// Returns the cached value for `key`, or awaits `producer` and
    /// caches its result.
    ///
    /// On a hit the producer is never invoked. On a miss the producer's
    /// error propagates unchanged and nothing is cached; failures are
    /// not negatively cached.
    pub async fn memoize<T, E, F, Fut>(
        &self,
        key: &str,
        opts: &SetOptions,
        producer: F,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(cached) = self.get::<T>(key, opts.backend) {
            return Ok(cached);
        }

        let produced = producer().await?;
        self.set(key, &produced, opts);
        Ok(produced)
    }

    /// Cache-owned keys present in a backend (full storage keys).
    fn cache_keys(&self, backend: Backend) -> Vec<String> {
        self.storage
            .keys(backend)
            .into_iter()
            .filter(|k| k.starts_with(CACHE_PREFIX))
            .collect()
    }

    /// Raw `(storage key, stored string)` pairs for every cache-owned
    /// entry in a backend. Diagnostics and administration only.
    pub(crate) fn raw_entries(&self, backend: Backend) -> Vec<(String, String)> {
        self.cache_keys(backend)
            .into_iter()
            .filter_map(|key| self.storage.read(backend, &key).map(|raw| (key, raw)))
            .collect()
    }

    /// Direct storage removal by full storage key.
    pub(crate) fn remove_raw(&self, backend: Backend, storage_key: &str) {
        self.storage.remove(backend, storage_key);
    }

    /// Direct storage write by full storage key, bypassing the codec.
    #[cfg(test)]
    pub(crate) fn write_raw(&self, backend: Backend, storage_key: &str, raw: &str) {
        let _ = self.storage.write(backend, storage_key, raw);
    }
}
