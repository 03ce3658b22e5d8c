//! Cache Module
//!
//! Expiring, bounded response cache. Entries carry a per-entry timeout that
//! is checked lazily on read; once the capacity is reached a cull pass drops
//! every third key in insertion order.

mod clock;
mod entry;
mod order;
mod simple;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use simple::SimpleCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Entry lifetime used when `set` is not given an explicit timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Soft capacity above which `set` runs a cull pass
pub const DEFAULT_MAX_ENTRIES: usize = 200;

/// Smaller pair used in the upstream documentation example
/// (`SimpleCache(timeout=120, max_entries=50)`). Kept separate from the
/// constructor defaults; neither is derived from the other.
pub const EXAMPLE_TIMEOUT_SECS: u64 = 120;
pub const EXAMPLE_MAX_ENTRIES: usize = 50;

/// A cull pass removes one key out of every `CULL_FREQUENCY`
pub const CULL_FREQUENCY: usize = 3;
