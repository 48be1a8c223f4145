//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

/// Cache layer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// The size and count thresholds are empirically chosen heuristics carried over
/// as configurable defaults, not derived limits.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Default TTL in seconds for entries without an explicit TTL
    pub default_ttl_seconds: u64,
    /// Size in MB above which the cache is considered near its quota
    pub near_limit_mb: f64,
    /// Size in MB above which periodic smart cleanup kicks in
    pub hard_ceiling_mb: f64,
    /// Expired-entry count that triggers a cleanup recommendation
    pub expired_trigger: usize,
    /// Total-entry count that triggers a cleanup recommendation
    pub total_trigger: usize,
    /// Interval in seconds between periodic expired-entry sweeps
    pub clean_interval_seconds: u64,
    /// Interval in seconds between periodic smart-cleanup checks
    pub smart_interval_seconds: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CACHE_NEAR_LIMIT_MB` - Near-limit threshold in MB (default: 8.0)
    /// - `CACHE_HARD_CEILING_MB` - Smart-cleanup ceiling in MB (default: 9.0)
    /// - `CACHE_EXPIRED_TRIGGER` - Expired-count cleanup trigger (default: 10)
    /// - `CACHE_TOTAL_TRIGGER` - Total-count cleanup trigger (default: 100)
    /// - `CACHE_CLEAN_INTERVAL` - Expired sweep interval in seconds (default: 600)
    /// - `CACHE_SMART_INTERVAL` - Smart cleanup interval in seconds (default: 1800)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl_seconds: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl_seconds),
            near_limit_mb: env::var("CACHE_NEAR_LIMIT_MB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.near_limit_mb),
            hard_ceiling_mb: env::var("CACHE_HARD_CEILING_MB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.hard_ceiling_mb),
            expired_trigger: env::var("CACHE_EXPIRED_TRIGGER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expired_trigger),
            total_trigger: env::var("CACHE_TOTAL_TRIGGER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.total_trigger),
            clean_interval_seconds: env::var("CACHE_CLEAN_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.clean_interval_seconds),
            smart_interval_seconds: env::var("CACHE_SMART_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.smart_interval_seconds),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: 300,
            near_limit_mb: 8.0,
            hard_ceiling_mb: 9.0,
            expired_trigger: 10,
            total_trigger: 100,
            clean_interval_seconds: 600,
            smart_interval_seconds: 1800,
        }
    }
}
