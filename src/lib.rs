//! @ai:module:intent storbench library: fio result aggregation and baseline comparison
//! @ai:module:layer application
//! @ai:module:public_api config, error, results, metrics, compare, pipeline, report

pub mod compare;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod results;

pub use compare::{BaselineComparator, BaselineProfile, BaselineValue, ComparisonResult};
pub use config::AnalysisConfig;
pub use error::{Error, ErrorKind, Result};
pub use metrics::{AggregatedMetrics, Aggregator, AnalysisRun, MetricName, MetricSet, Statistic};
pub use pipeline::{AnalysisOutcome, Analyzer};
pub use report::ReportGenerator;
pub use results::{ResultDocument, ResultLoader};
