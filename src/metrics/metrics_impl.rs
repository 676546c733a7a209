use crate::metrics::traits::RankingMetricsRecorder;

#[derive(Debug, Default, Clone)]
pub struct RankingMetrics {
    pub observe_calls: u64,
    pub new_keys: u64,
    pub rank_refreshes: u64,
    pub rank_inserts: u64,
    pub rank_replacements: u64,
    pub rank_rejections: u64,
    pub clears: u64,
}

impl RankingMetrics {
    pub fn new() -> RankingMetrics {
        Self::default()
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl RankingMetricsRecorder for RankingMetrics {
    fn record_observe_call(&mut self) {
        self.observe_calls += 1;
    }

    fn record_new_key(&mut self) {
        self.new_keys += 1;
    }

    fn record_rank_refresh(&mut self) {
        self.rank_refreshes += 1;
    }

    fn record_rank_insert(&mut self) {
        self.rank_inserts += 1;
    }

    fn record_rank_replace(&mut self) {
        self.rank_replacements += 1;
    }

    fn record_rank_reject(&mut self) {
        self.rank_rejections += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_increments_matching_counters() {
        let mut metrics = RankingMetrics::new();
        metrics.record_observe_call();
        metrics.record_observe_call();
        metrics.record_new_key();
        metrics.record_rank_insert();
        metrics.record_rank_refresh();
        metrics.record_rank_replace();
        metrics.record_rank_reject();
        metrics.record_clear();

        assert_eq!(metrics.observe_calls, 2);
        assert_eq!(metrics.new_keys, 1);
        assert_eq!(metrics.rank_inserts, 1);
        assert_eq!(metrics.rank_refreshes, 1);
        assert_eq!(metrics.rank_replacements, 1);
        assert_eq!(metrics.rank_rejections, 1);
        assert_eq!(metrics.clears, 1);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut metrics = RankingMetrics::new();
        metrics.record_observe_call();
        metrics.record_clear();
        metrics.reset();
        assert_eq!(metrics.observe_calls, 0);
        assert_eq!(metrics.clears, 0);
    }
}
