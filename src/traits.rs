//! # Ranking Trait
//!
//! [`HitRanking`] is the seam between the ranking implementation and the code
//! that drives it (workload generators, the heap profiler, the CLI). It covers
//! the observe/rank/clear contract only; construction and configuration stay
//! on the concrete types.
//!
//! ## Architecture
//!
//! ```text
//!                    ┌──────────────────────────────────────┐
//!                    │           HitRanking<K>              │
//!                    │                                      │
//!                    │  observe(&mut, K) → u64              │
//!                    │  top_ranked(&) → Vec<K>              │
//!                    │  count(&, &K) → Option<u64>          │
//!                    │  tracked_len(&) → usize              │
//!                    │  capacity(&) → usize                 │
//!                    │  clear(&mut)                         │
//!                    └──────────────────┬───────────────────┘
//!                                       │
//!                                       ▼
//!                    ┌──────────────────────────────────────┐
//!                    │   RankedCounter<K>                   │
//!                    │   (FrequencyStore + TopK)            │
//!                    └──────────────────────────────────────┘
//!
//!   ConcurrentHitRanking: marker for types safe to share across threads
//!   (e.g. ConcurrentRankedCounter).
//! ```
//!
//! ## Example
//!
//! ```
//! use iprank::traits::HitRanking;
//! use iprank::tracker::RankedCounter;
//!
//! fn replay<R: HitRanking<u32>>(ranking: &mut R, keys: &[u32]) {
//!     for &key in keys {
//!         ranking.observe(key);
//!     }
//! }
//!
//! let mut counter = RankedCounter::new(2);
//! replay(&mut counter, &[1, 2, 2, 3, 3, 3]);
//! assert_eq!(counter.top_ranked(), vec![3, 2]);
//! ```

/// Exact frequency counting with a bounded ranking of the most frequent keys.
pub trait HitRanking<K> {
    /// Records one occurrence of `key` and returns its count afterwards.
    fn observe(&mut self, key: K) -> u64;

    /// Returns the ranked keys, highest count first.
    fn top_ranked(&self) -> Vec<K>;

    /// Returns the exact count for `key`, or `None` if it was never observed
    /// since the last clear.
    fn count(&self, key: &K) -> Option<u64>;

    /// Number of keys currently in the ranking.
    fn tracked_len(&self) -> usize;

    /// Maximum number of ranked keys.
    fn capacity(&self) -> usize;

    /// Discards all counts and the ranking.
    fn clear(&mut self);

    /// Returns `true` if nothing is ranked.
    fn is_empty(&self) -> bool {
        self.tracked_len() == 0
    }
}

/// Marker trait for rankings that are safe to share across threads.
pub trait ConcurrentHitRanking: Send + Sync {}
