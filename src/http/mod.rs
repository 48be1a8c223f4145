//! HTTP Interception Layer
//!
//! Transparent caching around an HTTP client: per-request policy
//! resolution, deterministic cache-key derivation, and the pre/post
//! hooks that serve cacheable requests from the store.

mod client;
mod interceptor;
mod key;
mod policy;

use std::collections::BTreeMap;

pub use client::{CachedClient, ClientError, FetchResult};
pub use interceptor::{CacheInterceptor, Interceptor, Preflight};
pub use key::derive_key;
pub use policy::{CacheDecision, EndpointCachePolicy, PolicyTable, RequestOverride};

pub use reqwest::Method;

// == Request Descriptor ==
/// The request shape the cache layer keys on: method, url, and query
/// parameters.
///
/// Parameters live in a `BTreeMap` so their serialization order is
/// deterministic; two requests that differ only in parameter insertion
/// order collapse to the same cache slot.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub params: BTreeMap<String, String>,
    /// Request-specific cache override; wins over any endpoint policy
    pub cache: Option<RequestOverride>,
}

impl RequestDescriptor {
    /// Descriptor with no parameters and no override.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: BTreeMap::new(),
            cache: None,
        }
    }

    /// GET descriptor, the common case.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Adds one query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Adds many query parameters.
    pub fn with_params<K, V, I>(mut self, params: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in params {
            self.params.insert(k.into(), v.into());
        }
        self
    }

    /// Attaches a request-specific cache override.
    pub fn with_cache(mut self, cache: RequestOverride) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Normalized `k=v&k=v` rendering of the parameters, sorted by key.
    pub fn canonical_params(&self) -> String {
        let mut out = String::new();
        for (k, v) in &self.params {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(k);
            out.push('=');
            out.push_str(v);
        }
        out
    }
}
