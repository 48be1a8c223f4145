//! Endpoint cache policy resolution.
//!
//! A declarative table maps URL patterns to TTL/backend/enablement
//! settings. Resolution order: request-specific override, then the
//! first matching endpoint policy, then the global default. A request
//! that resolves to nothing passes straight through to the network.

use std::collections::HashSet;

use super::{derive_key, Method, RequestDescriptor};
use crate::storage::Backend;

// == Endpoint Policy ==
/// Caching rules for one family of endpoints, matched by URL substring.
#[derive(Debug, Clone)]
pub struct EndpointCachePolicy {
    /// Substring matched against the request URL
    pub pattern: String,
    /// Entry lifetime in seconds
    pub ttl_seconds: u64,
    /// Whether matching requests are cached at all
    pub enabled: bool,
    /// Backend that receives matching entries
    pub backend: Backend,
    /// HTTP methods eligible for caching (default: GET only)
    pub methods: HashSet<Method>,
    /// Fixed cache key instead of the derived hash
    pub key_override: Option<String>,
}

impl EndpointCachePolicy {
    /// Enabled GET-only policy on the durable backend.
    pub fn new(pattern: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            pattern: pattern.into(),
            ttl_seconds,
            enabled: true,
            backend: Backend::Durable,
            methods: HashSet::from([Method::GET]),
            key_override: None,
        }
    }

    fn matches(&self, req: &RequestDescriptor) -> bool {
        req.url.contains(&self.pattern)
    }
}

// == Request Override ==
/// Per-request cache settings; any field set here wins over the
/// endpoint policy and the global default.
#[derive(Debug, Clone, Default)]
pub struct RequestOverride {
    pub enabled: Option<bool>,
    pub ttl_seconds: Option<u64>,
    pub backend: Option<Backend>,
    pub key: Option<String>,
}

impl RequestOverride {
    /// Override that disables caching for one request.
    pub fn disabled() -> Self {
        Self {
            enabled: Some(false),
            ..Self::default()
        }
    }

    /// Override that forces caching with an explicit TTL.
    pub fn ttl(ttl_seconds: u64) -> Self {
        Self {
            enabled: Some(true),
            ttl_seconds: Some(ttl_seconds),
            ..Self::default()
        }
    }
}

// == Cache Decision ==
/// Resolved caching settings for one request.
#[derive(Debug, Clone)]
pub struct CacheDecision {
    /// Storage key (policy override, or derived from the request shape)
    pub key: String,
    /// Entry lifetime; zero delegates to the store's configured default
    pub ttl_seconds: u64,
    /// Target backend
    pub backend: Backend,
}

// == Policy Table ==
/// Ordered endpoint policies plus an optional global default.
///
/// The first policy whose pattern matches wins, so narrower patterns
/// belong before broader ones.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    policies: Vec<EndpointCachePolicy>,
    default_policy: Option<EndpointCachePolicy>,
}

impl PolicyTable {
    /// Empty table: nothing is cached until policies are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an endpoint policy.
    pub fn push(mut self, policy: EndpointCachePolicy) -> Self {
        self.policies.push(policy);
        self
    }

    /// Sets the global default applied when no endpoint pattern matches.
    /// The default's `pattern` is ignored.
    pub fn with_default(mut self, policy: EndpointCachePolicy) -> Self {
        self.default_policy = Some(policy);
        self
    }

    /// The policy table for the sports-data API this crate fronts.
    ///
    /// Volatile match/live data gets short TTLs on the ephemeral
    /// backend; slow-moving reference data (sports, leagues, teams)
    /// lives longer on the durable backend.
    pub fn sports_api_defaults() -> Self {
        let mut live = EndpointCachePolicy::new("/matches/live", 30);
        live.backend = Backend::Ephemeral;
        let mut matches = EndpointCachePolicy::new("/matches", 60);
        matches.backend = Backend::Ephemeral;
        let mut sports = EndpointCachePolicy::new("/sports", 3600);
        sports.key_override = Some("cache_sports_list".to_string());

        Self::new()
            .push(live)
            .push(matches)
            .push(sports)
            .push(EndpointCachePolicy::new("/leagues", 3600))
            .push(EndpointCachePolicy::new("/teams", 1800))
            .push(EndpointCachePolicy::new("/standings", 300))
            .with_default(EndpointCachePolicy::new("", 300))
    }

    // == Resolution ==
    /// Resolves the caching settings for a request, or None when the
    /// request is not cacheable (disabled, method not eligible, or no
    /// policy and no default).
    pub fn resolve(&self, req: &RequestDescriptor) -> Option<CacheDecision> {
        let base = self
            .policies
            .iter()
            .find(|p| p.matches(req))
            .or(self.default_policy.as_ref());
        let over = req.cache.as_ref();

        let enabled = over
            .and_then(|o| o.enabled)
            .unwrap_or_else(|| base.map_or(false, |p| p.enabled));
        if !enabled {
            return None;
        }

        let method_ok = match base {
            Some(p) => p.methods.contains(&req.method),
            None => req.method == Method::GET,
        };
        if !method_ok {
            return None;
        }

        let key = over
            .and_then(|o| o.key.clone())
            .or_else(|| base.and_then(|p| p.key_override.clone()))
            .unwrap_or_else(|| derive_key(req));

        Some(CacheDecision {
            key,
            ttl_seconds: over
                .and_then(|o| o.ttl_seconds)
                .or_else(|| base.map(|p| p.ttl_seconds))
                .unwrap_or(0),
            backend: over
                .and_then(|o| o.backend)
                .or_else(|| base.map(|p| p.backend))
                .unwrap_or(Backend::Durable),
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PolicyTable {
        PolicyTable::sports_api_defaults()
    }

    #[test]
    fn test_endpoint_policy_wins_over_default() {
        let req = RequestDescriptor::get("https://api.sports.io/v3/leagues");
        let decision = table().resolve(&req).unwrap();

        assert_eq!(decision.ttl_seconds, 3600);
        assert_eq!(decision.backend, Backend::Durable);
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let req = RequestDescriptor::get("https://api.sports.io/v3/matches/live");
        let decision = table().resolve(&req).unwrap();

        // The narrower /matches/live policy is listed before /matches
        assert_eq!(decision.ttl_seconds, 30);
        assert_eq!(decision.backend, Backend::Ephemeral);
    }

    #[test]
    fn test_default_policy_applies_to_unmatched_url() {
        let req = RequestDescriptor::get("https://api.sports.io/v3/venues");
        let decision = table().resolve(&req).unwrap();

        assert_eq!(decision.ttl_seconds, 300);
    }

    #[test]
    fn test_no_default_means_passthrough() {
        let bare = PolicyTable::new().push(EndpointCachePolicy::new("/sports", 3600));
        let req = RequestDescriptor::get("https://api.sports.io/v3/venues");

        assert!(bare.resolve(&req).is_none());
    }

    #[test]
    fn test_non_get_not_cacheable_by_default() {
        let req = RequestDescriptor::new(Method::POST, "https://api.sports.io/v3/leagues");
        assert!(table().resolve(&req).is_none());
    }

    #[test]
    fn test_widened_methods_accepted() {
        let mut policy = EndpointCachePolicy::new("/search", 60);
        policy.methods.insert(Method::POST);
        let t = PolicyTable::new().push(policy);

        let req = RequestDescriptor::new(Method::POST, "https://api.sports.io/v3/search");
        assert!(t.resolve(&req).is_some());
    }

    #[test]
    fn test_disabled_policy_is_passthrough() {
        let mut policy = EndpointCachePolicy::new("/odds", 60);
        policy.enabled = false;
        let t = PolicyTable::new().push(policy);

        let req = RequestDescriptor::get("https://api.sports.io/v3/odds");
        assert!(t.resolve(&req).is_none());
    }

    #[test]
    fn test_request_override_disables_caching() {
        let req = RequestDescriptor::get("https://api.sports.io/v3/leagues")
            .with_cache(RequestOverride::disabled());

        assert!(table().resolve(&req).is_none());
    }

    #[test]
    fn test_request_override_ttl_wins() {
        let req = RequestDescriptor::get("https://api.sports.io/v3/leagues")
            .with_cache(RequestOverride::ttl(5));

        assert_eq!(table().resolve(&req).unwrap().ttl_seconds, 5);
    }

    #[test]
    fn test_request_override_key_wins() {
        let over = RequestOverride {
            key: Some("cache_pinned".to_string()),
            ..RequestOverride::default()
        };
        let req = RequestDescriptor::get("https://api.sports.io/v3/leagues").with_cache(over);

        assert_eq!(table().resolve(&req).unwrap().key, "cache_pinned");
    }

    #[test]
    fn test_policy_key_override() {
        let req = RequestDescriptor::get("https://api.sports.io/v3/sports");
        assert_eq!(table().resolve(&req).unwrap().key, "cache_sports_list");
    }

    #[test]
    fn test_derived_key_used_when_no_override() {
        let req = RequestDescriptor::get("https://api.sports.io/v3/teams").with_param("id", "50");
        let decision = table().resolve(&req).unwrap();

        assert_eq!(decision.key, derive_key(&req));
    }
}
