//! Cache Manager Module
//!
//! Operational facade over the cache store: aggregate statistics, entry
//! listing, category-based invalidation, quota heuristics, and the
//! smart-cleanup pass that composes them. None of this sits in the
//! request hot path.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{decode, AccessSnapshot, CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::storage::Backend;
use crate::tasks;

// == Categories ==
/// Invalidation categories: a closed set of tags, each mapping to key
/// substring patterns. Derived keys carry a slug of the URL path, so
/// these patterns match both derived and explicitly-named keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Sports,
    Matches,
    Leagues,
    Teams,
    All,
}

impl Category {
    /// Key substrings this category invalidates. `All` has no patterns;
    /// it clears everything instead.
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            Category::Sports => &["sports"],
            Category::Matches => &["matches", "live"],
            Category::Leagues => &["leagues", "standings"],
            Category::Teams => &["teams"],
            Category::All => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Sports => "sports",
            Category::Matches => "matches",
            Category::Leagues => "leagues",
            Category::Teams => "teams",
            Category::All => "all",
        };
        write!(f, "{name}")
    }
}

/// Returned when parsing an unrecognized category name.
#[derive(Error, Debug)]
#[error("unknown cache category: {0}")]
pub struct UnknownCategory(String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sports" => Ok(Category::Sports),
            "matches" => Ok(Category::Matches),
            "leagues" => Ok(Category::Leagues),
            "teams" => Ok(Category::Teams),
            "all" => Ok(Category::All),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

// == Reports ==
/// Diagnostic row for one live cached entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    /// Full storage key, prefix included
    pub key: String,
    pub backend: Backend,
    /// Estimated footprint (two bytes per character)
    pub size_bytes: usize,
    pub ttl_seconds: u64,
    pub age_seconds: u64,
    /// Creation time in ISO 8601 format
    pub created_at: String,
}

/// Outcome of [`CacheManager::cleanup_recommendations`].
#[derive(Debug, Clone, Serialize)]
pub struct CleanupRecommendations {
    pub should_clean: bool,
    pub reasons: Vec<String>,
    pub actions: Vec<String>,
}

/// Outcome of [`CacheManager::perform_smart_cleanup`].
#[derive(Debug, Clone, Serialize)]
pub struct SmartCleanupReport {
    pub entries_removed: usize,
    pub space_saved_mb: f64,
    pub actions_taken: Vec<String>,
}

struct Maintenance {
    expired_sweep: JoinHandle<()>,
    smart_sweep: JoinHandle<()>,
}

// == Cache Manager ==
/// Higher-level operational tools over a shared [`CacheStore`].
pub struct CacheManager {
    store: Arc<CacheStore>,
    config: CacheConfig,
    maintenance: Mutex<Option<Maintenance>>,
}

impl CacheManager {
    /// Creates a manager over a shared store.
    pub fn new(store: Arc<CacheStore>, config: CacheConfig) -> Self {
        Self {
            store,
            config,
            maintenance: Mutex::new(None),
        }
    }

    // == Statistics ==
    /// Full-scan statistics, straight from the store.
    pub fn full_stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Hit/miss counters, straight from the store.
    pub fn access_stats(&self) -> AccessSnapshot {
        self.store.access_stats()
    }

    // == Entry Listing ==
    /// Every live entry across both backends, oldest first.
    ///
    /// Expired and unreadable entries are omitted; they are logically
    /// absent even before a cleanup pass collects them.
    pub fn list_entries(&self) -> Vec<EntryInfo> {
        let mut entries = Vec::new();
        for backend in Backend::ALL {
            for (key, raw) in self.store.raw_entries(backend) {
                let Ok(entry) = decode::<serde_json::Value>(&raw) else {
                    continue;
                };
                if entry.is_expired() {
                    continue;
                }
                entries.push(EntryInfo {
                    key,
                    backend,
                    size_bytes: raw.chars().count() * 2,
                    ttl_seconds: entry.ttl_seconds,
                    age_seconds: entry.age_seconds(),
                    created_at: chrono::DateTime::from_timestamp_millis(entry.created_at as i64)
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_default(),
                });
            }
        }
        entries.sort_by(|a, b| b.age_seconds.cmp(&a.age_seconds));
        entries
    }

    // == Category Invalidation ==
    /// Removes every entry whose key matches one of the category's
    /// patterns; `All` clears both backends. Returns the count removed.
    pub fn invalidate_by_category(&self, category: Category) -> usize {
        let removed = match category {
            Category::All => self.store.clear(None),
            _ => {
                let patterns = category.patterns();
                let mut removed = 0;
                for backend in Backend::ALL {
                    for (key, _) in self.store.raw_entries(backend) {
                        if patterns.iter().any(|p| key.contains(p)) {
                            self.store.remove_raw(backend, &key);
                            removed += 1;
                        }
                    }
                }
                removed
            }
        };
        info!(category = %category, removed, "invalidated cache category");
        removed
    }

    // == Size Heuristics ==
    /// Total cache footprint in MB, rounded to two decimals.
    pub fn size_in_mb(&self) -> f64 {
        round2(self.full_stats().size_bytes() as f64 / (1024.0 * 1024.0))
    }

    /// True when the footprint exceeds the near-limit threshold. An
    /// early warning, not an enforced cap.
    pub fn is_near_limit(&self) -> bool {
        self.size_in_mb() > self.config.near_limit_mb
    }

    // == Cleanup Recommendations ==
    /// Pure function of the current stats. Three independent triggers:
    /// footprint, expired count, total count. Any one of them sets
    /// `should_clean` and contributes its own reason/action pair.
    pub fn cleanup_recommendations(&self) -> CleanupRecommendations {
        let stats = self.full_stats();
        let size_mb = round2(stats.size_bytes() as f64 / (1024.0 * 1024.0));

        let mut reasons = Vec::new();
        let mut actions = Vec::new();

        if size_mb > self.config.near_limit_mb {
            reasons.push(format!(
                "cache size {size_mb:.2} MB exceeds {:.0} MB",
                self.config.near_limit_mb
            ));
            actions.push("run smart cleanup to reclaim space".to_string());
        }
        if stats.total_expired() > self.config.expired_trigger {
            reasons.push(format!(
                "{} expired entries awaiting removal",
                stats.total_expired()
            ));
            actions.push("sweep expired entries".to_string());
        }
        if stats.total_entries() > self.config.total_trigger {
            reasons.push(format!(
                "{} entries exceed the {}-entry threshold",
                stats.total_entries(),
                self.config.total_trigger
            ));
            actions.push("invalidate unused categories".to_string());
        }

        let should_clean = !reasons.is_empty();
        if !should_clean {
            reasons.push("cache is healthy".to_string());
            actions.push("no action needed".to_string());
        }

        CleanupRecommendations {
            should_clean,
            reasons,
            actions,
        }
    }

    // == Smart Cleanup ==
    /// Expired entries first; the volatile match data second, and only
    /// if the cache is still near its limit.
    ///
    /// The ordering is deliberate: live, expensive-to-refetch reference
    /// data (hour-long league lists) is never discarded while cheap,
    /// fast-changing match data is still around.
    pub fn perform_smart_cleanup(&self) -> SmartCleanupReport {
        let size_before = self.size_in_mb();
        let mut actions = Vec::new();

        let expired = self.store.clean_expired();
        actions.push(format!("removed {expired} expired entries"));
        let mut removed = expired;

        if self.is_near_limit() {
            let volatile = self.invalidate_by_category(Category::Matches);
            actions.push(format!("invalidated {volatile} volatile match entries"));
            removed += volatile;
        }

        let report = SmartCleanupReport {
            entries_removed: removed,
            space_saved_mb: round2((size_before - self.size_in_mb()).max(0.0)),
            actions_taken: actions,
        };
        info!(
            removed = report.entries_removed,
            saved_mb = report.space_saved_mb,
            "smart cleanup finished"
        );
        report
    }

    // == Auto Cleanup ==
    /// Starts or stops the periodic maintenance tasks: an expired-entry
    /// sweep on the short interval and a ceiling-gated smart cleanup on
    /// the long one.
    ///
    /// Handles are kept so the tasks can be aborted; they are also
    /// aborted when the manager is dropped. Enabling twice is a no-op.
    /// Must be called within a tokio runtime.
    pub fn configure_auto_cleanup(&self, enabled: bool) {
        let mut guard = self
            .maintenance
            .lock()
            .unwrap_or_else(|e| e.into_inner());

        if enabled {
            if guard.is_some() {
                return;
            }
            *guard = Some(Maintenance {
                expired_sweep: tasks::spawn_expired_cleanup_task(
                    self.store.clone(),
                    self.config.clean_interval_seconds,
                ),
                smart_sweep: tasks::spawn_smart_cleanup_task(
                    self.store.clone(),
                    self.config.clone(),
                    self.config.smart_interval_seconds,
                ),
            });
            info!("auto cleanup enabled");
        } else if let Some(m) = guard.take() {
            m.expired_sweep.abort();
            m.smart_sweep.abort();
            info!("auto cleanup disabled");
        }
    }
}

impl Drop for CacheManager {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.maintenance.lock() {
            if let Some(m) = guard.take() {
                m.expired_sweep.abort();
                m.smart_sweep.abort();
            }
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
