//! Bounded, always-sorted top-K ranking.
//!
//! [`TopK`] holds at most `capacity` `(key, count)` entries ordered by count,
//! highest first. It does not count anything itself: callers feed it the
//! authoritative count for a key after every increment, and it decides whether
//! that key is refreshed, admitted into a free slot, admitted by evicting the
//! lowest entry, or rejected.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           TopK<K> Layout                                │
//! │                                                                         │
//! │   entries: Vec<RankEntry<K>>  (sorted by count, descending)             │
//! │                                                                         │
//! │     rank   0          1          2           3          4               │
//! │          ┌──────────┬──────────┬───────────┬──────────┬──────────────┐  │
//! │          │ 8.8.8.8  │ 8.8.8.4  │ 127.0.0.1 │ 1.1.1.1  │ 192.164.0.1  │  │
//! │          │    9     │    4     │     2     │    1     │      1       │  │
//! │          └──────────┴──────────┴───────────┴──────────┴──────────────┘  │
//! │                                                          ▲ lowest       │
//! │                                                                         │
//! │   index: FxHashMap<K, usize>  (key → rank, kept in sync)                │
//! │                                                                         │
//! │     8.8.8.8 → 0   8.8.8.4 → 1   127.0.0.1 → 2   1.1.1.1 → 3  ...        │
//! │                                                                         │
//! │   capacity: 5                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//! Update Flow
//! ───────────
//!   update(key, count):
//!     1. key in index      → overwrite count in place, move to its new rank
//!     2. len < capacity    → append, move up to its rank
//!     3. count > lowest    → overwrite the last slot, move up to its rank
//!     4. otherwise         → rejected, nothing changes
//!
//! Reorder
//! ───────
//!   Only the touched entry is out of place, so its new rank is found with a
//!   binary search over the sorted neighbours and the slice between the old
//!   and new rank is rotated by one. Moved entries get their index updated.
//!
//!     before:  [9] [4] [2] [1] [1]      (127.0.0.1: 2 → 5)
//!                        ▲
//!     target = partition_point(count >= 5) = 1
//!     rotate_right(entries[1..=2])
//!     after:   [9] [5] [4] [1] [1]
//! ```
//!
//! ## Tie-Breaking
//!
//! Entries with equal counts are ordered by when they reached that count,
//! earliest first. An entry that is refreshed or admitted moves ahead of every
//! entry with a strictly lower count only, so it lands behind peers that
//! already had the same count. This is exactly the order produced by
//! overwriting the entry and then running a stable descending sort over the
//! whole list.
//!
//! ## Operations
//!
//! | Operation   | Description                            | Complexity         |
//! |-------------|----------------------------------------|--------------------|
//! | `update`    | Refresh / insert / replace / reject    | O(log K + d)       |
//! | `snapshot`  | Keys in rank order                     | O(K)               |
//! | `rank_of`   | Current rank of a key                  | O(1)               |
//! | `count_of`  | Tracked count of a key                 | O(1)               |
//! | `min_count` | Lowest tracked count                   | O(1)               |
//! | `clear`     | Drop all entries                       | O(K)               |
//!
//! `d` is the distance the entry moves; with unit increments it is the number
//! of entries tied at the previous count.
//!
//! ## Example Usage
//!
//! ```
//! use iprank::ds::{RankUpdate, TopK};
//!
//! let mut top = TopK::new(2);
//! assert_eq!(top.update("a", 1), RankUpdate::Inserted);
//! assert_eq!(top.update("b", 1), RankUpdate::Inserted);
//!
//! // Full: a newcomer must strictly beat the lowest count.
//! assert_eq!(top.update("c", 1), RankUpdate::Rejected);
//! assert_eq!(top.update("a", 2), RankUpdate::Refreshed);
//! assert_eq!(top.snapshot(), vec!["a", "b"]);
//!
//! let replaced = top.update("c", 2);
//! assert!(matches!(replaced, RankUpdate::Replaced(evicted) if evicted.key == "b"));
//! assert_eq!(top.snapshot(), vec!["a", "c"]);
//! ```
//!
//! ## Thread Safety
//!
//! `TopK` is not thread-safe. It is meant to be mutated together with the
//! counter that feeds it, under one lock.

use std::hash::Hash;
use std::ops::Range;

use rustc_hash::FxHashMap;

use crate::error::InvariantError;

/// One ranked `(key, count)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankEntry<K> {
    pub key: K,
    pub count: u64,
}

/// What [`TopK::update`] did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankUpdate<K> {
    /// The key was already tracked; its count was overwritten.
    Refreshed,
    /// The key took a free slot.
    Inserted,
    /// The key displaced the lowest-ranked entry, returned here.
    Replaced(RankEntry<K>),
    /// The ranking was full and the count did not beat the lowest entry.
    Rejected,
}

impl<K> RankUpdate<K> {
    /// Returns `true` if the key is tracked after the update.
    #[inline]
    pub fn is_tracked(&self) -> bool {
        !matches!(self, RankUpdate::Rejected)
    }

    /// Returns the entry evicted by this update, if any.
    #[inline]
    pub fn evicted(&self) -> Option<&RankEntry<K>> {
        match self {
            RankUpdate::Replaced(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Fill level of a [`TopK`].
///
/// Moves forward only (`Empty → Partial → Full`); [`TopK::clear`] is the only
/// way back to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopKState {
    Empty,
    Partial,
    Full,
}

/// Bounded ranking of the highest-count keys.
///
/// See the module documentation for layout and ordering rules.
#[derive(Debug, Clone)]
pub struct TopK<K> {
    entries: Vec<RankEntry<K>>,
    index: FxHashMap<K, usize>,
    capacity: usize,
}

impl<K> TopK<K>
where
    K: Copy + Eq + Hash,
{
    /// Creates an empty ranking holding at most `capacity` entries.
    ///
    /// A capacity of 0 is honored: every update is rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::ds::TopK;
    ///
    /// let top: TopK<u32> = TopK::new(100);
    /// assert_eq!(top.capacity(), 100);
    /// assert!(top.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    /// Maximum number of tracked entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tracked entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if no free slot remains.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Returns the fill level.
    ///
    /// A zero-capacity ranking always reports [`TopKState::Empty`].
    pub fn state(&self) -> TopKState {
        if self.entries.is_empty() {
            TopKState::Empty
        } else if self.entries.len() >= self.capacity {
            TopKState::Full
        } else {
            TopKState::Partial
        }
    }

    /// Returns `true` if `key` is tracked.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the 0-based rank of `key`, if tracked.
    #[inline]
    pub fn rank_of(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Returns the tracked count of `key`, if tracked.
    #[inline]
    pub fn count_of(&self, key: &K) -> Option<u64> {
        self.rank_of(key).map(|pos| self.entries[pos].count)
    }

    /// Returns the entry at `rank`.
    #[inline]
    pub fn get(&self, rank: usize) -> Option<&RankEntry<K>> {
        self.entries.get(rank)
    }

    /// Returns the lowest tracked count.
    #[inline]
    pub fn min_count(&self) -> Option<u64> {
        self.entries.last().map(|entry| entry.count)
    }

    /// Returns the count a new key has to exceed to be admitted, or `None`
    /// while free slots remain.
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::ds::TopK;
    ///
    /// let mut top = TopK::new(2);
    /// top.update('a', 3);
    /// assert_eq!(top.admission_floor(), None);
    /// top.update('b', 1);
    /// assert_eq!(top.admission_floor(), Some(1));
    /// ```
    pub fn admission_floor(&self) -> Option<u64> {
        if self.is_full() {
            self.min_count().or(Some(u64::MAX))
        } else {
            None
        }
    }

    /// Tracked entries in rank order.
    #[inline]
    pub fn entries(&self) -> &[RankEntry<K>] {
        &self.entries
    }

    /// Iterates over tracked entries in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, RankEntry<K>> {
        self.entries.iter()
    }

    /// Iterates over tracked keys in rank order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    /// Returns the tracked keys in rank order.
    ///
    /// This is a projection of the current order; nothing is recomputed.
    pub fn snapshot(&self) -> Vec<K> {
        self.keys().collect()
    }

    /// Applies the authoritative `count` for `key`.
    ///
    /// 1. Tracked key: overwrite its count and move it to its new rank.
    /// 2. Free slot: insert and move it to its rank.
    /// 3. Full: replace the lowest entry if `count` is strictly greater,
    ///    otherwise reject without touching the ranking.
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::ds::{RankUpdate, TopK};
    ///
    /// let mut top = TopK::new(3);
    /// top.update(1u32, 1);
    /// top.update(2u32, 1);
    /// top.update(2u32, 2);
    /// assert_eq!(top.snapshot(), vec![2, 1]);
    /// assert_eq!(top.count_of(&2), Some(2));
    /// ```
    pub fn update(&mut self, key: K, count: u64) -> RankUpdate<K> {
        if let Some(&pos) = self.index.get(&key) {
            let previous = std::mem::replace(&mut self.entries[pos].count, count);
            if count > previous {
                self.promote(pos);
            } else if count < previous {
                self.demote(pos);
            }
            return RankUpdate::Refreshed;
        }

        if self.entries.len() < self.capacity {
            let pos = self.entries.len();
            self.entries.push(RankEntry { key, count });
            self.index.insert(key, pos);
            self.promote(pos);
            return RankUpdate::Inserted;
        }

        let Some(lowest) = self.entries.last() else {
            return RankUpdate::Rejected;
        };
        if count <= lowest.count {
            return RankUpdate::Rejected;
        }

        let pos = self.entries.len() - 1;
        let evicted = std::mem::replace(&mut self.entries[pos], RankEntry { key, count });
        self.index.remove(&evicted.key);
        self.index.insert(key, pos);
        self.promote(pos);
        RankUpdate::Replaced(evicted)
    }

    /// Removes all entries, keeping allocated storage.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Removes all entries and releases storage.
    pub fn clear_shrink(&mut self) {
        self.clear();
        self.entries.shrink_to_fit();
        self.index.shrink_to_fit();
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.entries.capacity() * std::mem::size_of::<RankEntry<K>>()
            + self.index.capacity() * std::mem::size_of::<(K, usize)>()
    }

    /// Checks ordering, bounds and index consistency.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] describing the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.entries.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.entries.len(),
                self.capacity
            )));
        }
        if self.index.len() != self.entries.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but ranking holds {} entries",
                self.index.len(),
                self.entries.len()
            )));
        }
        if let Some(pos) = self
            .entries
            .windows(2)
            .position(|pair| pair[0].count < pair[1].count)
        {
            return Err(InvariantError::new(format!(
                "rank {} has a lower count than rank {}",
                pos,
                pos + 1
            )));
        }
        for (pos, entry) in self.entries.iter().enumerate() {
            if self.index.get(&entry.key) != Some(&pos) {
                return Err(InvariantError::new(format!(
                    "index does not point at rank {}",
                    pos
                )));
            }
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates internal invariants (debug/test builds only).
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("TopK invariant violated: {}", err);
        }
    }

    /// Moves the entry at `pos` up past every entry with a strictly lower
    /// count.
    fn promote(&mut self, pos: usize) {
        let count = self.entries[pos].count;
        let target = self.entries[..pos].partition_point(|entry| entry.count >= count);
        if target < pos {
            self.entries[target..=pos].rotate_right(1);
            self.reindex(target..pos + 1);
        }
    }

    /// Moves the entry at `pos` down past every entry with a strictly higher
    /// count.
    fn demote(&mut self, pos: usize) {
        let count = self.entries[pos].count;
        let target = pos + self.entries[pos + 1..].partition_point(|entry| entry.count > count);
        if target > pos {
            self.entries[pos..=target].rotate_left(1);
            self.reindex(pos..target + 1);
        }
    }

    fn reindex(&mut self, ranks: Range<usize>) {
        for pos in ranks {
            let key = self.entries[pos].key;
            if let Some(slot) = self.index.get_mut(&key) {
                *slot = pos;
            }
        }
    }
}

impl<'a, K> IntoIterator for &'a TopK<K> {
    type Item = &'a RankEntry<K>;
    type IntoIter = std::slice::Iter<'a, RankEntry<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
