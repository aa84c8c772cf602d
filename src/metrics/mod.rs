//! @ai:module:intent Metric extraction, aggregation and statistics
//! @ai:module:layer application
//! @ai:module:public_api MetricName, MetricSet, AggregatedMetrics, Statistic, Aggregator, extract, compute_statistics

pub mod aggregator;
pub mod extractor;
pub mod stats;
pub mod types;

pub use aggregator::{
    Aggregator, AggregatorTrait, AnalysisRun, FileCheck, FileDiscovery, LoadFailure,
};
pub use extractor::extract;
pub use stats::{compute_all, compute_statistics};
pub use types::{AggregatedMetrics, MetricName, MetricSet, Statistic};
