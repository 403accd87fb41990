//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the memory store's read, expiry and snapshot rules.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{Clock, ManualClock, MemoryStore, Ttl};

// == Test Configuration ==
const TEST_DEFAULT_TTL_MS: u64 = 300_000;
const START_MS: u64 = 1_000_000;

fn new_store() -> (MemoryStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START_MS));
    (MemoryStore::with_clock(TEST_DEFAULT_TTL_MS, clock.clone()), clock)
}

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}"
}

/// Generates JSON values of a few shapes
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,32}".prop_map(|s| json!(s)),
        prop::collection::vec(any::<bool>(), 0..4).prop_map(|v| json!(v)),
        ("[a-z]{1,8}", any::<u32>()).prop_map(|(k, v)| json!({ k: v })),
    ]
}

fn ttl_strategy() -> impl Strategy<Value = Ttl> {
    prop_oneof![
        Just(Ttl::Default),
        Just(Ttl::Never),
        (0u64..10_000).prop_map(Ttl::After),
    ]
}

/// Sequence of store operations with clock steps in between
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value, ttl: Ttl },
    Get { key: String },
    Remove { key: String },
    Advance { ms: u64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy(), ttl_strategy())
            .prop_map(|(key, value, ttl)| CacheOp::Set { key, value, ttl }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Remove { key }),
        (0u64..5_000).prop_map(|ms| CacheOp::Advance { ms }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a value and reading it back before expiry returns the same value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let (mut store, _) = new_store();

        store.set(key.clone(), value.clone(), Ttl::Default);

        let entry = store.get(&key).unwrap();
        prop_assert_eq!(&entry.value, &value);
    }

    // Keys never written read as absent.
    #[test]
    fn prop_unset_keys_absent(keys in prop::collection::hash_set(key_strategy(), 1..20)) {
        let (mut store, _) = new_store();

        for key in keys {
            prop_assert!(store.get(&key).is_none());
        }
    }

    // An entry with a positive TTL is readable until the TTL elapses, then gone
    // from both reads and the table.
    #[test]
    fn prop_ttl_expiration(
        key in key_strategy(),
        value in value_strategy(),
        ttl_ms in 1u64..100_000
    ) {
        let (mut store, clock) = new_store();

        store.set(key.clone(), value.clone(), Ttl::After(ttl_ms));
        clock.advance(ttl_ms - 1);
        prop_assert!(store.get(&key).is_some(), "Entry should exist before TTL");

        clock.advance(1);
        prop_assert!(store.get(&key).is_none(), "Entry should expire at TTL");
        prop_assert!(!store.cache().contains_key(&key));
    }

    // Never-expiring entries survive any amount of elapsed time.
    #[test]
    fn prop_never_expires(key in key_strategy(), elapsed in any::<u32>()) {
        let (mut store, clock) = new_store();

        store.set(key.clone(), json!(true), Ttl::Never);
        clock.advance(elapsed as u64 * 1_000);
        prop_assert!(store.get(&key).is_some());
    }

    // Removing twice is the same as removing once.
    #[test]
    fn prop_remove_idempotent(key in key_strategy(), value in value_strategy()) {
        let (mut once, _) = new_store();
        let (mut twice, _) = new_store();

        once.set(key.clone(), value.clone(), Ttl::Default);
        twice.set(key.clone(), value, Ttl::Default);

        once.remove(&key);
        twice.remove(&key);
        prop_assert!(!twice.remove(&key));

        prop_assert_eq!(once.cache(), twice.cache());
    }

    // Reloading a store from its own table gives the same observable store.
    #[test]
    fn prop_reset_cache_roundtrip(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        let (mut store, clock) = new_store();

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl } => store.set(key, value, ttl),
                CacheOp::Get { key } => { store.get(&key); }
                CacheOp::Remove { key } => { store.remove(&key); }
                CacheOp::Advance { ms } => clock.advance(ms),
            }
        }

        let blob = serde_json::to_string(store.cache()).unwrap();
        let mut restored: MemoryStore = MemoryStore::with_clock(TEST_DEFAULT_TTL_MS, clock.clone());
        restored.reset_cache(serde_json::from_str(&blob).unwrap());
        prop_assert_eq!(restored.cache(), store.cache());

        let keys: Vec<String> = store.cache().keys().cloned().collect();
        for key in keys {
            let original = store.get(&key).cloned();
            let copy = restored.get(&key).cloned();
            prop_assert_eq!(original, copy);
        }
    }

    // The table always agrees with a simple model that applies expiry on read.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (mut store, clock) = new_store();
        let mut model: HashMap<String, (Value, Option<u64>)> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl } => {
                    let expiry = ttl
                        .resolve(TEST_DEFAULT_TTL_MS)
                        .map(|ms| clock.now_ms() + ms);
                    model.insert(key.clone(), (value.clone(), expiry));
                    store.set(key, value, ttl);
                }
                CacheOp::Get { key } => {
                    let now = clock.now_ms();
                    let expired = matches!(
                        model.get(&key),
                        Some((_, Some(expiry))) if now >= *expiry
                    );
                    if expired {
                        model.remove(&key);
                    }
                    let expected = model.get(&key).map(|(value, _)| value.clone());
                    let actual = store.get(&key).map(|entry| entry.value.clone());
                    prop_assert_eq!(actual, expected);
                }
                CacheOp::Remove { key } => {
                    prop_assert_eq!(store.remove(&key), model.remove(&key).is_some());
                }
                CacheOp::Advance { ms } => clock.advance(ms),
            }
            prop_assert_eq!(store.len(), model.len());
        }
    }
}
