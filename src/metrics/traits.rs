//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and export are split into small traits so the
//! ranking code only ever writes counters, and monitoring code only ever reads
//! them.
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────────────────────────────┐
//!                  │        RankingMetricsRecorder        │
//!                  │  observe_call / new_key              │
//!                  │  refresh / insert / replace / reject │
//!                  │  clear                               │
//!                  └──────────────────┬───────────────────┘
//!                                     │ implemented by
//!                                     ▼
//!                          ┌─────────────────────┐
//!                          │   RankingMetrics    │
//!                          └─────────────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! Recorders are mutated under `&mut self`: every recorded event happens inside
//! an `observe` or `clear` call that already holds exclusive access.

/// Counters for a frequency counter with a bounded ranking.
///
/// Every `observe` records exactly one call plus one ranking outcome
/// (refresh, insert, replace or reject).
pub trait RankingMetricsRecorder {
    fn record_observe_call(&mut self);
    fn record_new_key(&mut self);
    fn record_rank_refresh(&mut self);
    fn record_rank_insert(&mut self);
    fn record_rank_replace(&mut self);
    fn record_rank_reject(&mut self);
    fn record_clear(&mut self);
}

/// Produce a point-in-time copy of the recorded metrics.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
