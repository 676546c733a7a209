pub mod frequency_store;
pub mod top_k;

pub use frequency_store::FrequencyStore;
pub use top_k::{RankEntry, RankUpdate, TopK, TopKState};
