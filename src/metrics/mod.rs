pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
