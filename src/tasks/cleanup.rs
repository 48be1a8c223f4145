//! Cache maintenance tasks
//!
//! Periodic loops that keep the cache within bounds: a frequent sweep of
//! expired entries and a less frequent, ceiling-gated smart cleanup.
//! Each tick is one complete synchronous full scan.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::config::CacheConfig;
use crate::manager::CacheManager;

/// Spawns the periodic expired-entry sweep.
///
/// Returns the task handle so the owner can abort it; leaking the
/// handle would leak the timer across reloads of the owning module.
pub fn spawn_expired_cleanup_task(
    store: Arc<CacheStore>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, "starting expired-entry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.clean_expired();
            if removed > 0 {
                info!(removed, "expired-entry sweep removed entries");
            } else {
                debug!("expired-entry sweep found nothing to remove");
            }
        }
    })
}

/// Spawns the periodic smart-cleanup check.
///
/// Each tick compares the cache footprint against the configured hard
/// ceiling and runs a full smart cleanup only when it is exceeded, so
/// the heavier pass stays rare.
pub fn spawn_smart_cleanup_task(
    store: Arc<CacheStore>,
    config: CacheConfig,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            interval_secs,
            ceiling_mb = config.hard_ceiling_mb,
            "starting smart-cleanup task"
        );
        let manager = CacheManager::new(store, config.clone());

        loop {
            tokio::time::sleep(interval).await;

            let size_mb = manager.size_in_mb();
            if size_mb > config.hard_ceiling_mb {
                let report = manager.perform_smart_cleanup();
                info!(
                    size_mb,
                    removed = report.entries_removed,
                    saved_mb = report.space_saved_mb,
                    "smart cleanup ran above the ceiling"
                );
            } else {
                debug!(size_mb, "cache below ceiling, smart cleanup skipped");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{current_timestamp_ms, encode, CacheEntry, SetOptions};
    use crate::storage::Backend;
    use serde_json::json;

    #[tokio::test]
    async fn test_expired_sweep_removes_backdated_entries() {
        let store = Arc::new(CacheStore::in_memory());

        let dead = CacheEntry {
            data: json!(0),
            created_at: current_timestamp_ms().saturating_sub(10_000),
            ttl_seconds: 1,
            compressed: false,
        };
        let raw = encode(&dead, false).unwrap();
        store.write_raw(Backend::Durable, "cache_dead", &raw);
        store.set("alive", &json!(1), &SetOptions::ttl(300));

        let handle = spawn_expired_cleanup_task(store.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(!store.exists("cache_dead", Backend::Durable));
        assert!(store.exists("alive", Backend::Durable));

        handle.abort();
    }

    #[tokio::test]
    async fn test_smart_cleanup_task_idle_below_ceiling() {
        let store = Arc::new(CacheStore::in_memory());
        store.set("leagues_list", &json!([1]), &SetOptions::ttl(300));

        let handle =
            spawn_smart_cleanup_task(store.clone(), CacheConfig::default(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Tiny cache stays untouched
        assert!(store.exists("leagues_list", Backend::Durable));

        handle.abort();
    }

    #[tokio::test]
    async fn test_tasks_can_be_aborted() {
        let store = Arc::new(CacheStore::in_memory());

        let handle = spawn_expired_cleanup_task(store, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished());
    }
}
