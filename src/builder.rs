//! Builder for ranked counters.
//!
//! Collects the ranking capacity and sizing hints, validates them once, and
//! produces either a single-threaded [`RankedCounter`] or (with the
//! `concurrency` feature) a shared [`ConcurrentRankedCounter`].
//!
//! ## Example
//!
//! ```rust
//! use iprank::addr::Ipv4Key;
//! use iprank::builder::RankingBuilder;
//!
//! let mut top = RankingBuilder::new(10)
//!     .expected_addresses(50_000)
//!     .build::<Ipv4Key>();
//! top.observe_str("192.168.1.1").unwrap();
//! assert_eq!(top.capacity(), 10);
//! ```
//!
//! [`ConcurrentRankedCounter`]: crate::tracker::ConcurrentRankedCounter

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ConfigError;
#[cfg(feature = "concurrency")]
use crate::tracker::ConcurrentRankedCounter;
use crate::tracker::{DEFAULT_TOP_K, RankedCounter};

/// Largest accepted ranking capacity.
///
/// Reordering moves at most one run of tied entries per update, and the
/// ranking is pre-allocated at full size, so capacity is capped.
pub const MAX_TOP_K: usize = 1 << 20;

/// Validates a ranking capacity.
///
/// # Errors
///
/// Returns [`ConfigError`] if `capacity` is 0 or above [`MAX_TOP_K`].
pub fn validate_capacity(capacity: usize) -> Result<(), ConfigError> {
    if capacity == 0 {
        return Err(ConfigError::new("ranking capacity must be greater than 0"));
    }
    if capacity > MAX_TOP_K {
        return Err(ConfigError::new(format!(
            "ranking capacity {} exceeds the maximum of {}",
            capacity, MAX_TOP_K
        )));
    }
    Ok(())
}

/// Largest accepted [`RankingBuilder::expected_addresses`] hint.
///
/// The hint is allocated up front, so it is bounded well below the IPv4
/// address space.
pub const MAX_EXPECTED_ADDRESSES: usize = 1 << 26;

/// Validates a store pre-sizing hint.
///
/// # Errors
///
/// Returns [`ConfigError`] if `expected` is above [`MAX_EXPECTED_ADDRESSES`].
pub fn validate_expected_addresses(expected: usize) -> Result<(), ConfigError> {
    if expected > MAX_EXPECTED_ADDRESSES {
        return Err(ConfigError::new(format!(
            "expected address hint {} exceeds the maximum of {}",
            expected, MAX_EXPECTED_ADDRESSES
        )));
    }
    Ok(())
}

/// Configures and builds ranked counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingBuilder {
    capacity: usize,
    expected_addresses: usize,
}

impl RankingBuilder {
    /// Creates a builder ranking the `capacity` most frequent keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            expected_addresses: 0,
        }
    }

    /// Pre-sizes the frequency store for about `n` distinct keys.
    ///
    /// Only a hint: the store still grows past it.
    pub fn expected_addresses(mut self, n: usize) -> Self {
        self.expected_addresses = n;
        self
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Builds the counter.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid. For a non-panicking
    /// alternative, use [`try_build`](Self::try_build).
    pub fn build<K>(self) -> RankedCounter<K>
    where
        K: Copy + Eq + Hash + Debug,
    {
        match self.try_build() {
            Ok(counter) => counter,
            Err(e) => panic!("{}", e),
        }
    }

    /// Builds the counter, returning an error on invalid configuration
    /// instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is 0 or above [`MAX_TOP_K`],
    /// or the expected address hint is above [`MAX_EXPECTED_ADDRESSES`].
    ///
    /// # Example
    ///
    /// ```
    /// use iprank::builder::RankingBuilder;
    ///
    /// assert!(RankingBuilder::new(100).try_build::<u32>().is_ok());
    /// assert!(RankingBuilder::new(0).try_build::<u32>().is_err());
    /// ```
    pub fn try_build<K>(self) -> Result<RankedCounter<K>, ConfigError>
    where
        K: Copy + Eq + Hash + Debug,
    {
        validate_capacity(self.capacity)?;
        validate_expected_addresses(self.expected_addresses)?;
        Ok(RankedCounter::with_parts(
            self.capacity,
            self.expected_addresses,
        ))
    }

    /// Builds a shared, thread-safe counter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] under the same conditions as [`try_build`](Self::try_build).
    #[cfg(feature = "concurrency")]
    pub fn try_build_concurrent<K>(self) -> Result<ConcurrentRankedCounter<K>, ConfigError>
    where
        K: Copy + Eq + Hash + Debug,
    {
        self.try_build().map(ConcurrentRankedCounter::from)
    }
}

impl Default for RankingBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::Ipv4Key;

    #[test]
    fn default_uses_default_top_k() {
        let counter = RankingBuilder::default().build::<Ipv4Key>();
        assert_eq!(counter.capacity(), DEFAULT_TOP_K);
        assert!(counter.is_empty());
    }

    #[test]
    fn expected_addresses_presizes_store() {
        let small = RankingBuilder::new(10).build::<u32>();
        let large = RankingBuilder::new(10)
            .expected_addresses(10_000)
            .build::<u32>();
        assert!(large.approx_bytes() > small.approx_bytes());
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = RankingBuilder::new(0).try_build::<u32>().unwrap_err();
        assert!(err.message().contains("greater than 0"));
    }

    #[test]
    fn rejects_capacity_above_max() {
        let err = RankingBuilder::new(MAX_TOP_K + 1)
            .try_build::<u32>()
            .unwrap_err();
        assert!(err.message().contains("exceeds"));
        assert!(validate_capacity(MAX_TOP_K).is_ok());
    }

    #[test]
    fn rejects_oversized_expected_addresses() {
        let err = RankingBuilder::new(10)
            .expected_addresses(usize::MAX)
            .try_build::<u32>()
            .unwrap_err();
        assert!(err.message().contains("expected address hint"));
        assert!(validate_expected_addresses(MAX_EXPECTED_ADDRESSES).is_ok());
        assert!(validate_expected_addresses(MAX_EXPECTED_ADDRESSES + 1).is_err());
    }

    #[test]
    #[should_panic(expected = "greater than 0")]
    fn build_panics_on_invalid() {
        let _ = RankingBuilder::new(0).build::<u32>();
    }

    #[cfg(feature = "concurrency")]
    #[test]
    fn builds_concurrent_counter() {
        let counter = RankingBuilder::new(4)
            .try_build_concurrent::<u32>()
            .unwrap();
        counter.observe(1);
        assert_eq!(counter.capacity(), 4);
        assert_eq!(counter.top_ranked(), vec![1]);
        assert!(RankingBuilder::new(0).try_build_concurrent::<u32>().is_err());
    }
}
