pub use crate::addr::Ipv4Key;
pub use crate::builder::RankingBuilder;
pub use crate::ds::{RankEntry, RankUpdate, TopKState};
pub use crate::error::{ConfigError, InvalidAddressFormat};
pub use crate::traits::HitRanking;
#[cfg(feature = "concurrency")]
pub use crate::tracker::ConcurrentRankedCounter;
pub use crate::tracker::{DEFAULT_TOP_K, RankedCounter, TopAddresses};
