//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses, lazy expirations and cull passes.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing what the cache has done so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed because a lookup found them expired
    pub expirations: u64,
    /// Number of cull passes run by `set` or called directly
    pub culls: u64,
    /// Entries removed by cull passes
    pub culled: u64,
    /// Entries currently stored, expired ones included
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    // == Record Cull ==
    /// Counts one cull pass that removed `removed` entries.
    pub fn record_cull(&mut self, removed: usize) {
        self.culls += 1;
        self.culled += removed as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
