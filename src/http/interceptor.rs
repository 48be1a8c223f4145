//! Request/response cache hooks.
//!
//! The hooks are client-agnostic: any transport that can call
//! `before_request` ahead of the network and `after_response` behind it
//! gets transparent caching. A cache hit is an ordinary tagged value,
//! not error control flow.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{PolicyTable, RequestDescriptor};
use crate::cache::{CacheStore, SetOptions};

// == Preflight Outcome ==
/// Outcome of the pre-request hook.
#[derive(Debug)]
pub enum Preflight {
    /// Serve this cached payload and skip the network call entirely.
    Hit(Value),
    /// Not cacheable, or a miss: the real request should proceed.
    Forward,
}

// == Interceptor Contract ==
/// Pre/post hooks a transport adapter runs around each request.
pub trait Interceptor: Send + Sync {
    /// Called before the network. A `Hit` short-circuits the request.
    fn before_request(&self, req: &RequestDescriptor) -> Preflight;

    /// Called after a successful network response with the parsed body.
    fn after_response(&self, req: &RequestDescriptor, body: &Value);
}

// == Cache Interceptor ==
/// The cache-backed implementation: policy resolution decides whether
/// and where to look, the store does the rest.
///
/// Cache failures never surface here. The store already swallows them,
/// so a broken cache degrades to a passthrough, never a failed request.
pub struct CacheInterceptor {
    store: Arc<CacheStore>,
    policies: PolicyTable,
}

impl CacheInterceptor {
    pub fn new(store: Arc<CacheStore>, policies: PolicyTable) -> Self {
        Self { store, policies }
    }
}

impl Interceptor for CacheInterceptor {
    fn before_request(&self, req: &RequestDescriptor) -> Preflight {
        let Some(decision) = self.policies.resolve(req) else {
            return Preflight::Forward;
        };

        match self.store.get::<Value>(&decision.key, decision.backend) {
            Some(cached) => {
                debug!(key = %decision.key, url = %req.url, "serving response from cache");
                Preflight::Hit(cached)
            }
            None => Preflight::Forward,
        }
    }

    fn after_response(&self, req: &RequestDescriptor, body: &Value) {
        let Some(decision) = self.policies.resolve(req) else {
            return;
        };

        let opts = SetOptions {
            ttl_seconds: decision.ttl_seconds,
            backend: decision.backend,
            compress: false,
        };
        if self.store.set(&decision.key, body, &opts) {
            debug!(key = %decision.key, ttl = decision.ttl_seconds, "cached response");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{EndpointCachePolicy, Method, PolicyTable, RequestOverride};
    use crate::storage::Backend;
    use serde_json::json;

    fn interceptor() -> CacheInterceptor {
        CacheInterceptor::new(
            Arc::new(CacheStore::in_memory()),
            PolicyTable::sports_api_defaults(),
        )
    }

    #[test]
    fn test_miss_then_hit() {
        let icpt = interceptor();
        let req = RequestDescriptor::get("https://api.sports.io/v3/leagues").with_param("id", "39");

        assert!(matches!(icpt.before_request(&req), Preflight::Forward));

        let body = json!({"league": {"id": 39, "name": "Premier League"}});
        icpt.after_response(&req, &body);

        match icpt.before_request(&req) {
            Preflight::Hit(cached) => assert_eq!(cached, body),
            Preflight::Forward => panic!("expected a cache hit"),
        }
    }

    #[test]
    fn test_different_params_do_not_share_a_slot() {
        let icpt = interceptor();
        let a = RequestDescriptor::get("https://api.sports.io/v3/teams").with_param("id", "50");
        let b = RequestDescriptor::get("https://api.sports.io/v3/teams").with_param("id", "51");

        icpt.after_response(&a, &json!({"team": 50}));

        assert!(matches!(icpt.before_request(&b), Preflight::Forward));
        assert!(matches!(icpt.before_request(&a), Preflight::Hit(_)));
    }

    #[test]
    fn test_non_cacheable_request_is_forwarded_and_not_stored() {
        let store = Arc::new(CacheStore::in_memory());
        let icpt = CacheInterceptor::new(
            store.clone(),
            PolicyTable::new().push(EndpointCachePolicy::new("/sports", 60)),
        );
        let req = RequestDescriptor::get("https://api.sports.io/v3/venues");

        assert!(matches!(icpt.before_request(&req), Preflight::Forward));
        icpt.after_response(&req, &json!({"ignored": true}));

        assert_eq!(store.stats().total_entries(), 0);
    }

    #[test]
    fn test_post_is_not_cached_by_default() {
        let icpt = interceptor();
        let req = RequestDescriptor::new(Method::POST, "https://api.sports.io/v3/leagues");

        icpt.after_response(&req, &json!({"created": true}));
        assert!(matches!(icpt.before_request(&req), Preflight::Forward));
    }

    #[test]
    fn test_request_override_disables_caching() {
        let icpt = interceptor();
        let req = RequestDescriptor::get("https://api.sports.io/v3/leagues")
            .with_cache(RequestOverride::disabled());

        icpt.after_response(&req, &json!({"leagues": []}));
        assert!(matches!(icpt.before_request(&req), Preflight::Forward));
    }

    #[test]
    fn test_policy_backend_is_respected() {
        let store = Arc::new(CacheStore::in_memory());
        let icpt = CacheInterceptor::new(store.clone(), PolicyTable::sports_api_defaults());

        // /matches goes to the ephemeral backend per policy
        let req = RequestDescriptor::get("https://api.sports.io/v3/matches").with_param("live", "all");
        icpt.after_response(&req, &json!([{"match": 1}]));

        let stats = store.stats();
        assert_eq!(stats.ephemeral.total, 1);
        assert_eq!(stats.durable.total, 0);
    }
}
