//! Sportscache - a client-side response cache for sports-data APIs
//!
//! Sits between application code and a third-party sports-data API:
//! TTL-based expiration, two interchangeable storage backends, and
//! transparent request interception with per-endpoint cache policies.
//!
//! Construct one [`CacheStore`] (and optionally one [`CacheManager`])
//! at application start and share it by reference; per-test instances
//! stay cheap and isolated.

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod manager;
pub mod storage;
pub mod tasks;

pub use cache::{CacheEntry, CacheStats, CacheStore, SetOptions};
pub use config::CacheConfig;
pub use error::CacheError;
pub use http::{
    CacheInterceptor, CachedClient, EndpointCachePolicy, Interceptor, PolicyTable,
    RequestDescriptor, RequestOverride,
};
pub use manager::{CacheManager, Category};
pub use storage::{Backend, StorageAdapter};
