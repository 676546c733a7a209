//! iprank: exact IPv4 hit counting with a live top-K ranking.
//!
//! See `DESIGN.md` for the component layout and ordering rules.

pub mod addr;
pub mod builder;
pub mod ds;
pub mod error;
pub mod tracker;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;

pub use crate::addr::Ipv4Key;
pub use crate::ds::{FrequencyStore, RankEntry, RankUpdate, TopK, TopKState};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::RankingMetricsSnapshot;
#[cfg(feature = "concurrency")]
pub use crate::tracker::ConcurrentRankedCounter;
pub use crate::tracker::{DEFAULT_TOP_K, RankedCounter, TopAddresses};
