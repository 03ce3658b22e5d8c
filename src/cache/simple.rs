//! Simple Cache Module
//!
//! Thread-safe response cache with the interface of Django's low-level cache
//! API: `get`, `set`, `delete`, `has_key`, plus an explicit `cull`.

use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::cache::{
    CacheStats, CacheStore, Clock, SystemClock, DEFAULT_MAX_ENTRIES, DEFAULT_TIMEOUT_SECS,
};

// == Simple Cache ==
/// Expiring, bounded cache shared between threads.
///
/// Every operation holds one mutex for its whole duration, so operations from
/// different threads are linearized. The lock is taken once per public call;
/// nested steps (the delete inside an expired `get`, the cull inside `set`)
/// run on the already-locked store.
///
/// ```
/// use std::time::Duration;
/// use flickr_api::cache::SimpleCache;
///
/// // At most 50 entries, each living for 120 seconds
/// let cache: SimpleCache<String, String> = SimpleCache::new(Duration::from_secs(120), 50);
/// cache.set("photo:1".to_string(), "<rsp/>".to_string());
/// assert_eq!(cache.get(&"photo:1".to_string()), Some("<rsp/>".to_string()));
/// ```
#[derive(Debug)]
pub struct SimpleCache<K, V, C = SystemClock> {
    store: Mutex<CacheStore<K, V>>,
    clock: C,
}

impl<K, V> SimpleCache<K, V, SystemClock>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache whose entries live for `timeout` unless `set` is given
    /// another value, culled once `max_entries` keys are stored.
    pub fn new(timeout: Duration, max_entries: usize) -> Self {
        Self::with_clock(timeout, max_entries, SystemClock)
    }
}

impl<K, V> Default for SimpleCache<K, V, SystemClock>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS), DEFAULT_MAX_ENTRIES)
    }
}

impl<K, V, C> SimpleCache<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone,
    C: Clock,
{
    /// Creates a cache reading time from `clock`.
    pub fn with_clock(timeout: Duration, max_entries: usize, clock: C) -> Self {
        Self {
            store: Mutex::new(CacheStore::new(max_entries, timeout)),
            clock,
        }
    }

    // A panic while the lock was held cannot leave the store half-updated in
    // a way later calls trip over, so a poisoned lock is reused.
    fn lock(&self) -> MutexGuard<'_, CacheStore<K, V>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Get ==
    /// Fetches `key`. Missing and expired keys return `None`; an expired entry
    /// is removed on the way.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut store = self.lock();
        store.get(key, self.clock.now_ms())
    }

    /// Fetches `key`, returning `default` when it is missing or expired.
    pub fn get_or(&self, key: &K, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    // == Set ==
    /// Stores `value` for the default timeout.
    pub fn set(&self, key: K, value: V) {
        self.set_with_timeout(key, value, None);
    }

    /// Stores `value` for `timeout`, or for the default timeout when `None`.
    pub fn set_with_timeout(&self, key: K, value: V, timeout: Option<Duration>) {
        let mut store = self.lock();
        let now = self.clock.now_ms();
        store.set(key, value, timeout, now);
    }

    // == Delete ==
    /// Deletes `key`, failing silently if it does not exist.
    pub fn delete(&self, key: &K) {
        self.lock().delete(key);
    }

    // == Has Key ==
    /// Returns true if `key` is stored and has not expired.
    ///
    /// Defined as `get(key).is_some()`. Because absence is `None` rather than
    /// a sentinel value, a stored `None` (with `V = Option<T>`) still counts
    /// as present.
    pub fn has_key(&self, key: &K) -> bool {
        let mut store = self.lock();
        store.has_key(key, self.clock.now_ms())
    }

    /// Membership test, same as `has_key`.
    pub fn contains(&self, key: &K) -> bool {
        self.has_key(key)
    }

    // == Cull ==
    /// Drops every third key in insertion order. Returns how many went.
    pub fn cull(&self) -> usize {
        self.lock().cull()
    }

    // == Length ==
    /// Number of stored entries. Expired entries that no lookup has touched
    /// yet are included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn max_entries(&self) -> usize {
        self.lock().max_entries()
    }

    pub fn default_timeout(&self) -> Duration {
        self.lock().default_timeout()
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.lock().is_consistent()
    }
}
