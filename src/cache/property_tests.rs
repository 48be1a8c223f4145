//! Property-Based Tests for the Cache Store
//!
//! Uses proptest to verify store invariants over generated operation
//! sequences and payloads.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::cache::{CacheStore, SetOptions};
use crate::http::{derive_key, RequestDescriptor};
use crate::storage::Backend;

// == Strategies ==
/// Generates valid cache keys (non-empty, storage-safe)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates string payloads
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,256}"
}

/// Generates query parameter maps
fn params_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z]{1,8}", "[a-zA-Z0-9]{1,16}"), 0..6)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Round-trip: any value stored under any key reads back equal
    // before expiration.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let store = CacheStore::in_memory();

        prop_assert!(store.set(&key, &value, &SetOptions::default()));
        let retrieved: Option<String> = store.get(&key, Backend::Durable);
        prop_assert_eq!(retrieved.as_deref(), Some(value.as_str()));
    }

    // Overwrite: a second set under the same key leaves exactly one
    // entry holding the second value.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let store = CacheStore::in_memory();

        store.set(&key, &value1, &SetOptions::default());
        store.set(&key, &value2, &SetOptions::default());

        let retrieved: Option<String> = store.get(&key, Backend::Durable);
        prop_assert_eq!(retrieved.as_deref(), Some(value2.as_str()));
        prop_assert_eq!(store.stats().durable.total, 1);
    }

    // Delete: a deleted key is gone from subsequent reads.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let store = CacheStore::in_memory();

        store.set(&key, &value, &SetOptions::default());
        prop_assert!(store.delete(&key, Backend::Durable));
        prop_assert!(store.get::<String>(&key, Backend::Durable).is_none());
    }

    // Backend isolation: clearing one backend never touches the other.
    #[test]
    fn prop_clear_is_backend_scoped(
        keys in prop::collection::hash_set(valid_key_strategy(), 1..20)
    ) {
        let store = CacheStore::in_memory();
        let ephemeral = SetOptions {
            backend: Backend::Ephemeral,
            ..SetOptions::default()
        };

        for key in &keys {
            store.set(key, &"d", &SetOptions::default());
            store.set(key, &"e", &ephemeral);
        }

        prop_assert_eq!(store.clear(Some(Backend::Durable)), keys.len());
        prop_assert_eq!(store.stats().durable.total, 0);
        prop_assert_eq!(store.stats().ephemeral.total, keys.len());
    }

    // TTL bounds: a fresh entry's remaining lifetime never exceeds its
    // TTL and is not more than a few seconds below it.
    #[test]
    fn prop_ttl_remaining_bounds(key in valid_key_strategy(), ttl in 10u64..100_000) {
        let store = CacheStore::in_memory();

        store.set(&key, &1u32, &SetOptions::ttl(ttl));
        let remaining = store.ttl_remaining(&key, Backend::Durable);

        prop_assert!(remaining <= ttl as i64);
        prop_assert!(remaining >= ttl as i64 - 5);
    }

    // Statistics accuracy: hit/miss counters match a shadow model over
    // any operation sequence.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let store = CacheStore::in_memory();
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(&key, &value, &SetOptions::default());
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let retrieved: Option<String> = store.get(&key, Backend::Durable);
                    match model.get(&key) {
                        Some(expected) => {
                            expected_hits += 1;
                            prop_assert_eq!(retrieved.as_deref(), Some(expected.as_str()));
                        }
                        None => {
                            expected_misses += 1;
                            prop_assert!(retrieved.is_none());
                        }
                    }
                }
                CacheOp::Delete { key } => {
                    store.delete(&key, Backend::Durable);
                    model.remove(&key);
                }
            }
        }

        let snapshot = store.access_stats();
        prop_assert_eq!(snapshot.hits, expected_hits, "hits mismatch");
        prop_assert_eq!(snapshot.misses, expected_misses, "misses mismatch");
        prop_assert_eq!(store.stats().durable.total, model.len(), "entry count mismatch");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Key determinism: the derived key is a pure function of the
    // request shape, and any parameter change moves the key.
    #[test]
    fn prop_key_derivation_deterministic(
        url in "https://api\\.sports\\.io/v3/[a-z]{3,12}",
        params in params_strategy()
    ) {
        let a = RequestDescriptor::get(&url).with_params(params.clone());
        let b = RequestDescriptor::get(&url).with_params(params);

        prop_assert_eq!(derive_key(&a), derive_key(&b));
    }

    #[test]
    fn prop_key_changes_with_any_param(
        url in "https://api\\.sports\\.io/v3/[a-z]{3,12}",
        params in params_strategy(),
        extra_key in "[a-z]{9,12}",
        extra_value in "[a-zA-Z0-9]{1,16}"
    ) {
        // extra_key is longer than any generated param key, so it is new
        let base = RequestDescriptor::get(&url).with_params(params.clone());
        let widened = RequestDescriptor::get(&url)
            .with_params(params)
            .with_param(extra_key, extra_value);

        prop_assert_ne!(derive_key(&base), derive_key(&widened));
    }
}
