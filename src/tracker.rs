//! Exact frequency counting with a live top-K ranking.
//!
//! [`RankedCounter`] bundles a [`FrequencyStore`] (every key, exact counts)
//! with a [`TopK`] (the `capacity` highest counts, always sorted). Each
//! [`observe`](RankedCounter::observe) increments the store and immediately
//! feeds the fresh count to the ranking, so [`top_ranked`](RankedCounter::top_ranked)
//! is a projection of already-ordered state and never scans the key space.
//!
//! ## Architecture
//!
//! ```text
//!   observe(key)
//!        │
//!        ▼
//!   ┌───────────────────────┐   count    ┌──────────────────────────────┐
//!   │  FrequencyStore<K>    │ ─────────► │  TopK<K>                     │
//!   │  key → exact count    │            │  ≤ capacity entries, sorted  │
//!   │  (all keys)           │            │  refresh / insert / replace  │
//!   └───────────────────────┘            └──────────────┬───────────────┘
//!                                                       │
//!                                                       ▼
//!                                              top_ranked() → Vec<K>
//!
//!   clear(): both structures are emptied together
//! ```
//!
//! ## Guarantees
//!
//! - `count(k)` is the number of `observe(k)` calls since the last `clear`.
//! - The ranking holds `min(capacity, distinct keys)` entries.
//! - No key outside the ranking has a count above the lowest ranked count.
//! - Equal counts are ordered by when they reached that count, earliest first.
//!
//! ## Example Usage
//!
//! ```
//! use iprank::addr::Ipv4Key;
//! use iprank::tracker::TopAddresses;
//!
//! let mut top = TopAddresses::default();
//! for addr in ["8.8.8.8", "1.1.1.1", "8.8.8.8"] {
//!     top.observe_str(addr).unwrap();
//! }
//!
//! let ranked: Vec<String> = top.top_ranked().iter().map(Ipv4Key::to_string).collect();
//! assert_eq!(ranked, ["8.8.8.8", "1.1.1.1"]);
//! assert_eq!(top.count(&"8.8.8.8".parse().unwrap()), Some(2));
//! ```
//!
//! ## Thread Safety
//!
//! `RankedCounter` is single-threaded (`&mut self` mutation). With the
//! `concurrency` feature, [`ConcurrentRankedCounter`] wraps one in a
//! `parking_lot::RwLock` so that an increment and its ranking update form one
//! atomic step.

use std::fmt::Debug;
use std::hash::Hash;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::RwLock;

use crate::addr::Ipv4Key;
use crate::builder::validate_capacity;
use crate::ds::{FrequencyStore, RankEntry, RankUpdate, TopK, TopKState};
use crate::error::{ConfigError, InvalidAddressFormat, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::RankingMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::RankingMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{MetricsSnapshotProvider, RankingMetricsRecorder};
#[cfg(feature = "concurrency")]
use crate::traits::ConcurrentHitRanking;
use crate::traits::HitRanking;

/// Default number of ranked keys.
pub const DEFAULT_TOP_K: usize = 100;

/// The demonstration stream: 17 observations over five addresses.
///
/// Replaying it yields `8.8.8.8` (9), `8.8.8.4` (4), `127.0.0.1` (2),
/// `1.1.1.1` (1), `192.164.0.1` (1).
pub const SAMPLE_STREAM: [&str; 17] = [
    "1.1.1.1",
    "127.0.0.1",
    "192.164.0.1",
    "8.8.8.8",
    "8.8.8.4",
    "8.8.8.8",
    "8.8.8.8",
    "8.8.8.8",
    "8.8.8.8",
    "8.8.8.8",
    "8.8.8.8",
    "8.8.8.8",
    "8.8.8.8",
    "8.8.8.4",
    "8.8.8.4",
    "8.8.8.4",
    "127.0.0.1",
];

/// Exact frequency counter with a bounded, always-sorted ranking.
///
/// See the module documentation for the update flow and guarantees.
#[derive(Debug, Clone)]
pub struct RankedCounter<K> {
    store: FrequencyStore<K>,
    ranking: TopK<K>,
    #[cfg(feature = "metrics")]
    metrics: RankingMetrics,
}

/// Ranked counter over IPv4 addresses.
pub type TopAddresses = RankedCounter<Ipv4Key>;

impl<K> RankedCounter<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Creates a counter ranking the `capacity` most frequent keys.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or above
    /// [`MAX_TOP_K`](crate::builder::MAX_TOP_K). Use
    /// [`try_new`](Self::try_new) for a non-panicking alternative.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(counter) => counter,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a counter, returning an error on invalid capacity instead of
    /// panicking.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is 0 or above
    /// [`MAX_TOP_K`](crate::builder::MAX_TOP_K).
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::tracker::RankedCounter;
    ///
    /// assert!(RankedCounter::<u32>::try_new(10).is_ok());
    /// assert!(RankedCounter::<u32>::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        validate_capacity(capacity)?;
        Ok(Self::with_parts(capacity, 0))
    }

    /// Builds a counter from an already validated capacity, pre-sizing the
    /// store for `expected_keys` distinct keys.
    pub(crate) fn with_parts(capacity: usize, expected_keys: usize) -> Self {
        Self {
            store: FrequencyStore::with_capacity(expected_keys),
            ranking: TopK::new(capacity),
            #[cfg(feature = "metrics")]
            metrics: RankingMetrics::default(),
        }
    }

    /// Records one occurrence of `key` and returns its count afterwards.
    ///
    /// The ranking is updated in the same call: the key is refreshed if
    /// already ranked, takes a free slot if one remains, or displaces the
    /// lowest entry if its count is now strictly greater.
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::tracker::RankedCounter;
    ///
    /// let mut counter = RankedCounter::new(2);
    /// assert_eq!(counter.observe('a'), 1);
    /// assert_eq!(counter.observe('a'), 2);
    /// assert_eq!(counter.top_ranked(), vec!['a']);
    /// ```
    pub fn observe(&mut self, key: K) -> u64 {
        let count = self.store.record(key);
        let outcome = self.ranking.update(key, count);

        if let RankUpdate::Replaced(evicted) = &outcome {
            log::trace!(
                "ranking evicted {:?} (count {}) for {:?} (count {})",
                evicted.key,
                evicted.count,
                key,
                count
            );
        }

        #[cfg(feature = "metrics")]
        self.record_outcome(count, &outcome);

        count
    }

    /// Observes every key yielded by `keys`, in order.
    ///
    /// Returns the number of observations made.
    pub fn observe_batch<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter().map(|key| self.observe(key)).count()
    }

    /// Returns the ranked keys, highest count first.
    ///
    /// The result has `min(capacity, distinct keys)` elements.
    pub fn top_ranked(&self) -> Vec<K> {
        self.ranking.snapshot()
    }

    /// Borrowed view of the ranking with counts, highest first.
    pub fn ranked(&self) -> &[RankEntry<K>] {
        self.ranking.entries()
    }

    /// Owned copy of the ranking with counts, highest first.
    pub fn ranked_entries(&self) -> Vec<RankEntry<K>> {
        self.ranking.entries().to_vec()
    }

    /// Returns the exact count for `key`, ranked or not.
    #[inline]
    pub fn count(&self, key: &K) -> Option<u64> {
        self.store.count(key)
    }

    /// Returns the 0-based rank of `key`, if ranked.
    #[inline]
    pub fn rank_of(&self, key: &K) -> Option<usize> {
        self.ranking.rank_of(key)
    }

    /// Discards every count and the ranking.
    ///
    /// The store releases its memory; capacity is kept. Clearing an empty
    /// counter is a no-op.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing ranked counter: {} distinct keys, {} observations",
            self.store.distinct(),
            self.store.total()
        );

        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.store.reset();
        self.ranking.clear();
    }

    /// Number of distinct keys observed since the last clear.
    #[inline]
    pub fn distinct(&self) -> usize {
        self.store.distinct()
    }

    /// Number of observations since the last clear.
    #[inline]
    pub fn total_observations(&self) -> u64 {
        self.store.total()
    }

    /// Maximum number of ranked keys.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ranking.capacity()
    }

    /// Number of keys currently ranked.
    #[inline]
    pub fn tracked_len(&self) -> usize {
        self.ranking.len()
    }

    /// Returns `true` if nothing was observed since the last clear.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Fill level of the ranking.
    #[inline]
    pub fn state(&self) -> TopKState {
        self.ranking.state()
    }

    /// Read-only access to the underlying store.
    pub fn store(&self) -> &FrequencyStore<K> {
        &self.store
    }

    /// Read-only access to the underlying ranking.
    pub fn ranking(&self) -> &TopK<K> {
        &self.ranking
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        self.store.approx_bytes() + self.ranking.approx_bytes()
    }

    /// Checks that the ranking is well formed and agrees with the store.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] describing the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.ranking.check_invariants()?;

        let expected_len = self.ranking.capacity().min(self.store.distinct());
        if self.ranking.len() != expected_len {
            return Err(InvariantError::new(format!(
                "ranking holds {} entries, expected {}",
                self.ranking.len(),
                expected_len
            )));
        }

        for entry in self.ranking.iter() {
            if self.store.count(&entry.key) != Some(entry.count) {
                return Err(InvariantError::new(format!(
                    "ranked count {} for {:?} disagrees with store count {:?}",
                    entry.count,
                    entry.key,
                    self.store.count(&entry.key)
                )));
            }
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates internal invariants (debug/test builds only).
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("RankedCounter invariant violated: {}", err);
        }
        self.store.debug_validate_invariants();
    }

    #[cfg(feature = "metrics")]
    fn record_outcome(&mut self, count: u64, outcome: &RankUpdate<K>) {
        self.metrics.record_observe_call();
        if count == 1 {
            self.metrics.record_new_key();
        }
        match outcome {
            RankUpdate::Refreshed => self.metrics.record_rank_refresh(),
            RankUpdate::Inserted => self.metrics.record_rank_insert(),
            RankUpdate::Replaced(_) => self.metrics.record_rank_replace(),
            RankUpdate::Rejected => self.metrics.record_rank_reject(),
        }
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> RankingMetricsSnapshot {
        RankingMetricsSnapshot {
            observe_calls: self.metrics.observe_calls,
            new_keys: self.metrics.new_keys,
            rank_refreshes: self.metrics.rank_refreshes,
            rank_inserts: self.metrics.rank_inserts,
            rank_replacements: self.metrics.rank_replacements,
            rank_rejections: self.metrics.rank_rejections,
            clears: self.metrics.clears,
            tracked_len: self.ranking.len(),
            capacity: self.ranking.capacity(),
            distinct_keys: self.store.distinct(),
            total_observations: self.store.total(),
        }
    }

    /// Resets the metric counters to zero without touching the ranking.
    #[cfg(feature = "metrics")]
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}

impl RankedCounter<Ipv4Key> {
    /// Parses `addr` and observes it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAddressFormat`] for malformed input; the counter is
    /// left untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::tracker::TopAddresses;
    ///
    /// let mut top = TopAddresses::new(10);
    /// assert_eq!(top.observe_str("10.0.0.1").unwrap(), 1);
    /// assert!(top.observe_str("10.0.0").is_err());
    /// assert_eq!(top.total_observations(), 1);
    /// ```
    pub fn observe_str(&mut self, addr: &str) -> Result<u64, InvalidAddressFormat> {
        let key = Ipv4Key::parse(addr)?;
        Ok(self.observe(key))
    }
}

impl<K> Default for RankedCounter<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::with_parts(DEFAULT_TOP_K, 0)
    }
}

impl<K> HitRanking<K> for RankedCounter<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn observe(&mut self, key: K) -> u64 {
        RankedCounter::observe(self, key)
    }

    fn top_ranked(&self) -> Vec<K> {
        RankedCounter::top_ranked(self)
    }

    fn count(&self, key: &K) -> Option<u64> {
        RankedCounter::count(self, key)
    }

    fn tracked_len(&self) -> usize {
        RankedCounter::tracked_len(self)
    }

    fn capacity(&self) -> usize {
        RankedCounter::capacity(self)
    }

    fn clear(&mut self) {
        RankedCounter::clear(self)
    }
}

#[cfg(feature = "metrics")]
impl<K> MetricsSnapshotProvider<RankingMetricsSnapshot> for RankedCounter<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn snapshot(&self) -> RankingMetricsSnapshot {
        self.metrics_snapshot()
    }
}

// ---------------------------------------------------------------------------
// Concurrent wrapper
// ---------------------------------------------------------------------------

/// Thread-safe [`RankedCounter`] behind a `parking_lot::RwLock`.
///
/// [`observe`](Self::observe), [`observe_batch`](Self::observe_batch) and
/// [`clear`](Self::clear) take the **write lock**, so the store increment and
/// the ranking update are applied as one step. Queries take the **read lock**
/// and never see a half-applied observation. Clones share the same state.
///
/// # Example
///
/// ```
/// use iprank::tracker::ConcurrentRankedCounter;
/// use std::thread;
///
/// let counter = ConcurrentRankedCounter::new(10);
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let counter = counter.clone();
///         thread::spawn(move || {
///             for _ in 0..100 {
///                 counter.observe(7u32);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(counter.count(&7), Some(400));
/// ```
#[cfg(feature = "concurrency")]
#[derive(Debug)]
pub struct ConcurrentRankedCounter<K> {
    inner: Arc<RwLock<RankedCounter<K>>>,
}

#[cfg(feature = "concurrency")]
impl<K> Clone for ConcurrentRankedCounter<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K> ConcurrentRankedCounter<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Creates a shared counter ranking the `capacity` most frequent keys.
    ///
    /// # Panics
    ///
    /// Panics on invalid capacity. Use [`try_new`](Self::try_new) for a
    /// non-panicking alternative.
    pub fn new(capacity: usize) -> Self {
        Self::from(RankedCounter::new(capacity))
    }

    /// Creates a shared counter, returning an error on invalid capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is 0 or above
    /// [`MAX_TOP_K`](crate::builder::MAX_TOP_K).
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        RankedCounter::try_new(capacity).map(Self::from)
    }

    /// Records one occurrence of `key` and returns its count afterwards.
    pub fn observe(&self, key: K) -> u64 {
        self.inner.write().observe(key)
    }

    /// Observes every key yielded by `keys` under a single write lock.
    pub fn observe_batch<I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        self.inner.write().observe_batch(keys)
    }

    /// Returns the ranked keys, highest count first.
    pub fn top_ranked(&self) -> Vec<K> {
        self.inner.read().top_ranked()
    }

    /// Returns the ranking with counts, highest first.
    pub fn ranked_entries(&self) -> Vec<RankEntry<K>> {
        self.inner.read().ranked_entries()
    }

    /// Returns the exact count for `key`.
    pub fn count(&self, key: &K) -> Option<u64> {
        self.inner.read().count(key)
    }

    /// Discards every count and the ranking.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Number of distinct keys observed since the last clear.
    pub fn distinct(&self) -> usize {
        self.inner.read().distinct()
    }

    /// Number of observations since the last clear.
    pub fn total_observations(&self) -> u64 {
        self.inner.read().total_observations()
    }

    /// Number of keys currently ranked.
    pub fn tracked_len(&self) -> usize {
        self.inner.read().tracked_len()
    }

    /// Maximum number of ranked keys.
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Runs `f` against a consistent view of the counter.
    ///
    /// The read lock is held for the duration of `f`, so several queries can
    /// be combined without an observation landing in between.
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::tracker::ConcurrentRankedCounter;
    ///
    /// let counter = ConcurrentRankedCounter::new(5);
    /// counter.observe_batch([1u32, 2, 2]);
    /// let (top, total) = counter.read(|c| (c.top_ranked(), c.total_observations()));
    /// assert_eq!(top, vec![2, 1]);
    /// assert_eq!(total, 3);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&RankedCounter<K>) -> R,
    {
        f(&self.inner.read())
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> RankingMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl ConcurrentRankedCounter<Ipv4Key> {
    /// Parses `addr` and observes it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAddressFormat`] for malformed input; no lock is taken.
    pub fn observe_str(&self, addr: &str) -> Result<u64, InvalidAddressFormat> {
        let key = Ipv4Key::parse(addr)?;
        Ok(self.observe(key))
    }
}

#[cfg(feature = "concurrency")]
impl<K> From<RankedCounter<K>> for ConcurrentRankedCounter<K> {
    fn from(counter: RankedCounter<K>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(counter)),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K> Default for ConcurrentRankedCounter<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::from(RankedCounter::default())
    }
}

#[cfg(feature = "concurrency")]
impl<K> ConcurrentHitRanking for ConcurrentRankedCounter<K> where K: Send + Sync {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
