//! Cached HTTP client adapter.
//!
//! Decorates a reqwest client with the interceptor hooks: cacheable
//! requests are answered from the store without touching the network,
//! and cacheable responses are written back after they arrive.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::{Interceptor, Preflight, RequestDescriptor};

// == Client Error ==
/// Failures of the real network call. Cache-layer problems never show
/// up here; they degrade to passthrough behavior instead.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure or non-success HTTP status
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

// == Fetch Result ==
/// A response body tagged with its origin.
///
/// `from_cache` exists for diagnostics; callers receive the same shape
/// either way.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub data: Value,
    pub from_cache: bool,
}

// == Cached Client ==
/// A reqwest client wrapped with transparent caching.
pub struct CachedClient {
    http: reqwest::Client,
    interceptor: Arc<dyn Interceptor>,
}

impl CachedClient {
    /// Wraps a default reqwest client.
    pub fn new(interceptor: Arc<dyn Interceptor>) -> Self {
        Self::with_client(reqwest::Client::new(), interceptor)
    }

    /// Wraps a preconfigured reqwest client.
    pub fn with_client(http: reqwest::Client, interceptor: Arc<dyn Interceptor>) -> Self {
        Self { http, interceptor }
    }

    /// GET a JSON body, served from cache when the policy allows.
    pub async fn get_json(&self, req: RequestDescriptor) -> Result<FetchResult, ClientError> {
        self.request_json(req).await
    }

    /// Runs one request through the interceptor hooks.
    ///
    /// On a preflight hit the network is skipped entirely. Otherwise the
    /// real request proceeds; only a successful (2xx) JSON response is
    /// offered back to the cache.
    pub async fn request_json(&self, req: RequestDescriptor) -> Result<FetchResult, ClientError> {
        if let Preflight::Hit(data) = self.interceptor.before_request(&req) {
            return Ok(FetchResult {
                data,
                from_cache: true,
            });
        }

        let mut builder = self.http.request(req.method.clone(), &req.url);
        if !req.params.is_empty() {
            builder = builder.query(&req.params);
        }
        let response = builder.send().await?.error_for_status()?;
        let data: Value = response.json().await?;

        self.interceptor.after_response(&req, &data);

        Ok(FetchResult {
            data,
            from_cache: false,
        })
    }
}
