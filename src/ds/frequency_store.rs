//! Exact occurrence counter.
//!
//! [`FrequencyStore`] maps each key to the number of times it has been
//! recorded since the last reset. Counts start at 1 and grow by exactly 1 per
//! [`record`](FrequencyStore::record); nothing is ever approximated, sampled or
//! decayed.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    FrequencyStore<K> Layout                   │
//! │                                                               │
//! │   counts: FxHashMap<K, u64>                                   │
//! │                                                               │
//! │     ┌─────────────────┬─────────┐                             │
//! │     │  key            │  count  │                             │
//! │     ├─────────────────┼─────────┤                             │
//! │     │  8.8.8.8        │    9    │                             │
//! │     │  8.8.8.4        │    4    │                             │
//! │     │  127.0.0.1      │    2    │                             │
//! │     └─────────────────┴─────────┘                             │
//! │                                                               │
//! │   total: 15   (sum of all counts)                             │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation | Description                          | Complexity     |
//! |-----------|--------------------------------------|----------------|
//! | `record`  | Increment and return the new count   | O(1) amortized |
//! | `count`   | Current count for a key              | O(1)           |
//! | `reset`   | Drop every entry and release memory  | O(n)           |
//!
//! ## Memory
//!
//! The store grows with the number of distinct keys. [`reset`](FrequencyStore::reset)
//! shrinks the table back down instead of only clearing it, so a long-running
//! process that resets periodically returns to a small footprint.
//!
//! ## Example Usage
//!
//! ```
//! use iprank::ds::FrequencyStore;
//!
//! let mut store = FrequencyStore::new();
//! assert_eq!(store.record(7u32), 1);
//! assert_eq!(store.record(7u32), 2);
//! assert_eq!(store.record(9u32), 1);
//!
//! assert_eq!(store.count(&7), Some(2));
//! assert_eq!(store.distinct(), 2);
//! assert_eq!(store.total(), 3);
//!
//! store.reset();
//! assert!(store.is_empty());
//! assert_eq!(store.record(7u32), 1);
//! ```
//!
//! ## Thread Safety
//!
//! `FrequencyStore` is not thread-safe. Wrap it in a lock, or use
//! [`ConcurrentRankedCounter`](crate::tracker::ConcurrentRankedCounter), which
//! guards the store and the ranking under a single lock.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Exact per-key occurrence counts.
#[derive(Debug, Clone)]
pub struct FrequencyStore<K> {
    counts: FxHashMap<K, u64>,
    total: u64,
}

impl<K> FrequencyStore<K>
where
    K: Eq + Hash,
{
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            counts: FxHashMap::default(),
            total: 0,
        }
    }

    /// Creates an empty store sized for `capacity` distinct keys.
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::ds::FrequencyStore;
    ///
    /// let store: FrequencyStore<u32> = FrequencyStore::with_capacity(1024);
    /// assert!(store.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            total: 0,
        }
    }

    /// Increments the count for `key` and returns the new count.
    ///
    /// The first observation of a key yields 1.
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::ds::FrequencyStore;
    ///
    /// let mut store = FrequencyStore::new();
    /// assert_eq!(store.record("a"), 1);
    /// assert_eq!(store.record("a"), 2);
    /// ```
    #[inline]
    pub fn record(&mut self, key: K) -> u64 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        self.total += 1;
        *count
    }

    /// Returns the current count for `key`, or `None` if it was never
    /// recorded since the last reset.
    #[inline]
    pub fn count(&self, key: &K) -> Option<u64> {
        self.counts.get(key).copied()
    }

    /// Returns `true` if `key` has been recorded since the last reset.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.counts.contains_key(key)
    }

    /// Number of distinct keys recorded.
    #[inline]
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Number of `record` calls since the last reset.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns `true` if nothing has been recorded since the last reset.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over `(key, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(key, &count)| (key, count))
    }

    /// Removes every entry and releases the backing storage.
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::ds::FrequencyStore;
    ///
    /// let mut store = FrequencyStore::with_capacity(4096);
    /// for key in 0..4096u32 {
    ///     store.record(key);
    /// }
    /// let before = store.approx_bytes();
    ///
    /// store.reset();
    /// assert!(store.is_empty());
    /// assert_eq!(store.total(), 0);
    /// assert!(store.approx_bytes() < before);
    /// ```
    pub fn reset(&mut self) {
        self.counts.clear();
        self.counts.shrink_to_fit();
        self.total = 0;
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.counts.capacity() * std::mem::size_of::<(K, u64)>()
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates internal invariants (debug/test builds only).
    pub fn debug_validate_invariants(&self) {
        assert!(self.counts.values().all(|&count| count > 0));
        let sum: u64 = self.counts.values().sum();
        assert_eq!(sum, self.total);
        if self.is_empty() {
            assert_eq!(self.total, 0);
        }
    }
}

impl<K> Default for FrequencyStore<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_starts_at_one_and_increments() {
        let mut store = FrequencyStore::new();
        assert_eq!(store.record("a"), 1);
        assert_eq!(store.record("a"), 2);
        assert_eq!(store.record("a"), 3);
        assert_eq!(store.count(&"a"), Some(3));
    }

    #[test]
    fn keys_are_counted_independently() {
        let mut store = FrequencyStore::new();
        store.record(1u32);
        store.record(2u32);
        store.record(1u32);
        assert_eq!(store.count(&1), Some(2));
        assert_eq!(store.count(&2), Some(1));
        assert_eq!(store.count(&3), None);
        assert!(store.contains(&2));
        assert!(!store.contains(&3));
        assert_eq!(store.distinct(), 2);
        assert_eq!(store.total(), 3);
    }

    #[test]
    fn reset_clears_counts_and_total() {
        let mut store = FrequencyStore::new();
        for key in 0..100u32 {
            store.record(key);
        }
        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.distinct(), 0);
        assert_eq!(store.total(), 0);
        assert_eq!(store.count(&5), None);
        assert_eq!(store.record(5), 1);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut store: FrequencyStore<u32> = FrequencyStore::new();
        store.reset();
        store.reset();
        assert!(store.is_empty());
        store.debug_validate_invariants();
    }

    #[test]
    fn accepts_full_u32_domain() {
        let mut store = FrequencyStore::new();
        assert_eq!(store.record(0u32), 1);
        assert_eq!(store.record(u32::MAX), 1);
        assert_eq!(store.record(u32::MAX), 2);
    }

    #[test]
    fn iter_yields_every_entry() {
        let mut store = FrequencyStore::new();
        store.record("x");
        store.record("y");
        store.record("y");
        let mut pairs: Vec<_> = store.iter().map(|(k, c)| (*k, c)).collect();
        pairs.sort();
        assert_eq!(pairs, vec![("x", 1), ("y", 2)]);
    }

    #[test]
    fn debug_invariants_hold() {
        let mut store = FrequencyStore::new();
        for key in [3u32, 1, 3, 3, 2, 1] {
            store.record(key);
        }
        store.debug_validate_invariants();
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    proptest! {
        /// Property: count(k) equals the number of occurrences of k in the input
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_counts_are_exact(keys in prop::collection::vec(0u32..64, 0..400)) {
            let mut store = FrequencyStore::new();
            let mut reference: HashMap<u32, u64> = HashMap::new();

            for key in &keys {
                let count = store.record(*key);
                let expected = reference.entry(*key).or_insert(0);
                *expected += 1;
                prop_assert_eq!(count, *expected);
            }

            prop_assert_eq!(store.distinct(), reference.len());
            prop_assert_eq!(store.total(), keys.len() as u64);
            for (key, expected) in &reference {
                prop_assert_eq!(store.count(key), Some(*expected));
            }
            store.debug_validate_invariants();
        }
    }
}
