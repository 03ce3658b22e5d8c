//! Cache Store Module
//!
//! Unsynchronized cache engine: a map of entries plus their insertion order.
//! Every method takes the current time from the caller so that the locked
//! wrapper reads the clock once per operation.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, InsertionOrder, CULL_FREQUENCY};

// == Cache Store ==
/// Key/value storage with lazy expiry and order-based culling.
///
/// A key is present in `entries` if and only if it is present in `order`.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Iteration order used by `cull`
    order: InsertionOrder<K>,
    /// Activity counters
    stats: CacheStats,
    /// Size at or above which `set` culls first
    max_entries: usize,
    /// Lifetime of entries stored without an explicit timeout
    default_timeout: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default timeout.
    pub fn new(max_entries: usize, default_timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            max_entries,
            default_timeout,
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous value and expiry.
    ///
    /// When the store already holds `max_entries` keys a cull pass runs
    /// before the insert, so the new entry is never a cull candidate.
    pub fn set(&mut self, key: K, value: V, timeout: Option<Duration>, now_ms: u64) {
        if self.entries.len() >= self.max_entries {
            self.cull();
        }

        let timeout = timeout.unwrap_or(self.default_timeout);
        let entry = CacheEntry::new(value, now_ms, timeout);
        if self.entries.insert(key.clone(), entry).is_none() {
            self.order.push(key);
        }

        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value stored under `key` if it has not expired.
    ///
    /// An expired entry is deleted as a side effect and reported as a miss.
    pub fn get(&mut self, key: &K, now_ms: u64) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now_ms) => {
                self.stats.record_hit();
                return Some(entry.value.clone());
            }
            Some(entry) => {
                debug!(
                    age_ms = now_ms.saturating_sub(entry.created_at),
                    "cache entry expired"
                );
                true
            }
            None => false,
        };

        if expired {
            self.delete(key);
            self.stats.record_expiration();
        }
        self.stats.record_miss();
        None
    }

    // == Delete ==
    /// Removes `key`. Absent keys are ignored.
    pub fn delete(&mut self, key: &K) {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
    }

    // == Has Key ==
    /// True when `get` would return a value. Same side effect as `get`.
    pub fn has_key(&mut self, key: &K, now_ms: u64) -> bool {
        self.get(key, now_ms).is_some()
    }

    // == Cull ==
    /// Deletes every `CULL_FREQUENCY`-th key in insertion order, starting with
    /// the oldest. Entry age, expiry and access pattern play no part.
    ///
    /// Returns the number of entries removed.
    pub fn cull(&mut self) -> usize {
        let doomed = self.order.every_nth(CULL_FREQUENCY);
        let removed = doomed.len();

        for key in &doomed {
            self.delete(key);
        }

        self.stats.record_cull(removed);
        debug!(
            removed,
            remaining = self.entries.len(),
            "cache cull pass"
        );
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Number of stored entries, including expired ones that no lookup has
    /// touched yet. An upper bound on the live entry count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Keys in cull order, oldest first.
    pub fn keys(&self) -> Vec<K> {
        self.order.iter().cloned().collect()
    }

    /// Checks that the entry map and the order index hold the same keys.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.entries.len() == self.order.len()
            && self.order.iter().all(|k| self.entries.contains_key(k))
    }
}
