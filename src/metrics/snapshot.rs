#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RankingMetricsSnapshot {
    pub observe_calls: u64,
    pub new_keys: u64,

    pub rank_refreshes: u64,
    pub rank_inserts: u64,
    pub rank_replacements: u64,
    pub rank_rejections: u64,

    pub clears: u64,

    // gauges captured at snapshot time
    pub tracked_len: usize,
    pub capacity: usize,
    pub distinct_keys: usize,
    pub total_observations: u64,
}

impl RankingMetricsSnapshot {
    /// Fraction of observations that left the key in the ranking.
    ///
    /// Returns `0.0` before the first observation.
    pub fn tracked_ratio(&self) -> f64 {
        if self.observe_calls == 0 {
            return 0.0;
        }
        let tracked = self.rank_refreshes + self.rank_inserts + self.rank_replacements;
        tracked as f64 / self.observe_calls as f64
    }
}
