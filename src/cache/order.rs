//! Insertion Order Module
//!
//! Tracks the iteration order of cached keys for the cull pass.

use std::hash::Hash;

// == Insertion Order ==
/// Keys in the order they were first inserted.
///
/// Overwriting a key that is already tracked keeps its position; a key that
/// is removed and inserted again moves to the back. This is the iteration
/// order of an insertion-ordered map.
#[derive(Debug)]
pub struct InsertionOrder<K> {
    /// Oldest first
    order: Vec<K>,
}

impl<K> Default for InsertionOrder<K> {
    fn default() -> Self {
        Self { order: Vec::new() }
    }
}

impl<K: Hash + Eq + Clone> InsertionOrder<K> {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Appends `key` unless it is already tracked.
    pub fn push(&mut self, key: K) {
        if !self.contains(&key) {
            self.order.push(key);
        }
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &K) {
        self.order.retain(|k| k != key);
    }

    // == Every Nth ==
    /// Returns the keys at positions 0, n, 2n, ... without removing them.
    pub fn every_nth(&self, n: usize) -> Vec<K> {
        self.order.iter().step_by(n.max(1)).cloned().collect()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.order.iter().any(|k| k == key)
    }

    /// Iterates keys oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }
}
