//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check expiry, overwrite, delete, capacity and
//! consistency properties over generated operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

use crate::cache::{CacheStore, ManualClock, SimpleCache, CULL_FREQUENCY};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,16}"
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}"
}

/// A single step in a generated cache workload
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String, timeout_secs: Option<u64> },
    Get { key: String },
    Delete { key: String },
    Advance { millis: u64 },
    Cull,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    // A small key space so operations hit the same keys often
    let key = "[a-e]";
    prop_oneof![
        4 => (key, value_strategy(), prop::option::of(0u64..5))
            .prop_map(|(key, value, timeout_secs)| CacheOp::Set { key, value, timeout_secs }),
        3 => key.prop_map(|key| CacheOp::Get { key }),
        2 => key.prop_map(|key| CacheOp::Delete { key }),
        2 => (0u64..3_000).prop_map(|millis| CacheOp::Advance { millis }),
        1 => Just(CacheOp::Cull),
    ]
}

fn test_cache(max_entries: usize) -> (SimpleCache<String, String, ManualClock>, ManualClock) {
    let clock = ManualClock::new(0);
    let cache = SimpleCache::with_clock(TEST_DEFAULT_TIMEOUT, max_entries, clock.clone());
    (cache, clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Stored values come back until their timeout, then never again.
    #[test]
    fn prop_expiry(
        key in key_strategy(),
        value in value_strategy(),
        timeout_secs in 1u64..600,
        early_ms in 0u64..1_000,
        late_ms in 1u64..10_000,
    ) {
        let (cache, clock) = test_cache(TEST_MAX_ENTRIES);
        let timeout = Duration::from_secs(timeout_secs);

        cache.set_with_timeout(key.clone(), value.clone(), Some(timeout));
        prop_assert_eq!(cache.get(&key), Some(value.clone()));

        clock.advance(timeout.saturating_sub(Duration::from_millis(early_ms + 1)));
        prop_assert_eq!(cache.get(&key), Some(value));

        clock.advance(Duration::from_millis(early_ms + late_ms));
        prop_assert_eq!(cache.get(&key), None);
        prop_assert!(cache.is_empty());
    }

    // Any positive timeout, however small, is readable right after the set.
    #[test]
    fn prop_positive_timeout_readable_immediately(
        key in key_strategy(),
        value in value_strategy(),
        timeout_nanos in 1u64..5_000_000,
    ) {
        let (cache, _clock) = test_cache(TEST_MAX_ENTRIES);

        cache.set_with_timeout(key.clone(), value.clone(), Some(Duration::from_nanos(timeout_nanos)));

        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // Storing V1 then V2 under one key returns V2.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let (cache, _clock) = test_cache(TEST_MAX_ENTRIES);

        cache.set(key.clone(), value1);
        cache.set(key.clone(), value2.clone());

        prop_assert_eq!(cache.get(&key), Some(value2));
        prop_assert_eq!(cache.len(), 1);
    }

    // A repeated delete is a no-op.
    #[test]
    fn prop_delete_idempotent(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 0..20),
        victim in key_strategy(),
    ) {
        let (cache, _clock) = test_cache(TEST_MAX_ENTRIES);
        for (key, value) in &entries {
            cache.set(key.clone(), value.clone());
        }

        cache.delete(&victim);
        let len_after_first = cache.len();
        let snapshot: Vec<Option<String>> = entries.iter().map(|(k, _)| cache.get(k)).collect();

        cache.delete(&victim);
        prop_assert_eq!(cache.len(), len_after_first);
        let again: Vec<Option<String>> = entries.iter().map(|(k, _)| cache.get(k)).collect();
        prop_assert_eq!(snapshot, again);
        prop_assert_eq!(cache.get(&victim), None);
    }

    // The store never holds more than max_entries keys after a set.
    #[test]
    fn prop_capacity_enforcement(
        max_entries in 1usize..30,
        keys in prop::collection::vec(key_strategy(), 1..200)
    ) {
        let (cache, _clock) = test_cache(max_entries);

        for key in keys {
            cache.set(key, "v".to_string());
            prop_assert!(
                cache.len() <= max_entries,
                "Cache size {} exceeds max {}",
                cache.len(),
                max_entries
            );
        }
    }

    // Inserting max_entries + 1 distinct keys runs exactly one cull pass,
    // removing ceil(max_entries / 3) of the existing entries.
    #[test]
    fn prop_capacity_trigger(max_entries in 1usize..60) {
        let mut store: CacheStore<usize, usize> = CacheStore::new(max_entries, TEST_DEFAULT_TIMEOUT);

        for i in 0..=max_entries {
            store.set(i, i, None, 0);
        }

        let culled = (max_entries + CULL_FREQUENCY - 1) / CULL_FREQUENCY;
        prop_assert_eq!(store.stats().culls, 1);
        prop_assert_eq!(store.len(), max_entries - culled + 1);
        prop_assert!(store.keys().contains(&max_entries), "new key is never culled");
    }

    // After any operation sequence both internal structures agree, and
    // every observed value matches a reference model.
    #[test]
    fn prop_consistency_against_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let (cache, clock) = test_cache(4);
        // key -> (value, expires_at_ms)
        let mut model: Vec<(String, String, u64)> = Vec::new();

        for op in ops {
            let now = crate::cache::Clock::now_ms(&clock);
            match op {
                CacheOp::Set { key, value, timeout_secs } => {
                    if model.len() >= 4 {
                        let mut index = 0;
                        model.retain(|_| {
                            let keep = index % CULL_FREQUENCY != 0;
                            index += 1;
                            keep
                        });
                    }
                    let expires = now + timeout_secs.map(|s| s * 1_000).unwrap_or(300_000);
                    if let Some(slot) = model.iter_mut().find(|(k, _, _)| *k == key) {
                        slot.1 = value.clone();
                        slot.2 = expires;
                    } else {
                        model.push((key.clone(), value.clone(), expires));
                    }
                    cache.set_with_timeout(key, value, timeout_secs.map(Duration::from_secs));
                }
                CacheOp::Get { key } => {
                    let expected = match model.iter().position(|(k, _, _)| *k == key) {
                        Some(i) if model[i].2 > now => Some(model[i].1.clone()),
                        Some(i) => {
                            model.remove(i);
                            None
                        }
                        None => None,
                    };
                    prop_assert_eq!(cache.get(&key), expected);
                }
                CacheOp::Delete { key } => {
                    model.retain(|(k, _, _)| *k != key);
                    cache.delete(&key);
                }
                CacheOp::Advance { millis } => clock.advance(Duration::from_millis(millis)),
                CacheOp::Cull => {
                    let mut index = 0;
                    model.retain(|_| {
                        let keep = index % CULL_FREQUENCY != 0;
                        index += 1;
                        keep
                    });
                    cache.cull();
                }
            }

            prop_assert!(cache.is_consistent(), "entry map and order index diverged");
            prop_assert_eq!(cache.len(), model.len());
        }
    }

    // A cull never removes more than a third (rounded up) of the keys.
    #[test]
    fn prop_cull_fraction(keys in prop::collection::hash_set(key_strategy(), 0..50)) {
        let (cache, _clock) = test_cache(TEST_MAX_ENTRIES);
        for key in &keys {
            cache.set(key.clone(), "v".to_string());
        }

        let before = cache.len();
        let removed = cache.cull();

        prop_assert_eq!(removed, (before + 2) / 3);
        prop_assert_eq!(cache.len(), before - removed);

        let survivors: HashSet<String> = keys.iter().filter(|k| cache.has_key(k)).cloned().collect();
        prop_assert_eq!(survivors.len(), before - removed);
    }
}
