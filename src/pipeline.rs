//! @ai:module:intent Wire aggregation, statistics and comparison into one pass
//! @ai:module:layer application
//! @ai:module:public_api Analyzer, AnalysisOutcome

use crate::compare::{BaselineComparator, BaselineComparatorTrait, BaselineProfile, ComparisonResult};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::metrics::{compute_all, Aggregator, AggregatorTrait, AnalysisRun, MetricName, Statistic};

/// @ai:intent Everything one analysis pass produced
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub run: AnalysisRun,
    pub statistics: Vec<(MetricName, Statistic)>,
    pub comparisons: Vec<ComparisonResult>,
    pub stddev_threshold: f64,
}

impl AnalysisOutcome {
    pub fn flagged(&self) -> impl Iterator<Item = &ComparisonResult> + '_ {
        self.comparisons.iter().filter(|c| c.flagged)
    }
}

/// @ai:intent Runs the aggregate -> statistics -> compare pipeline
pub struct Analyzer<A: AggregatorTrait, C: BaselineComparatorTrait> {
    aggregator: A,
    comparator: C,
    baseline: BaselineProfile,
    stddev_threshold: f64,
}

impl Analyzer<Aggregator, BaselineComparator> {
    /// @ai:intent Build the standard pipeline from configuration
    /// @ai:pre config has passed validate()
    /// @ai:effects pure
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let threshold = config.analysis.stddev_threshold;
        Self {
            aggregator: Aggregator::new(config.discovery.clone(), &config.analysis.metrics),
            comparator: BaselineComparator::new(threshold),
            baseline: config.baseline.clone(),
            stddev_threshold: threshold,
        }
    }
}

impl<A: AggregatorTrait, C: BaselineComparatorTrait> Analyzer<A, C> {
    pub fn new(aggregator: A, comparator: C, baseline: BaselineProfile, stddev_threshold: f64) -> Self {
        Self {
            aggregator,
            comparator,
            baseline,
            stddev_threshold,
        }
    }

    /// @ai:intent Analyze every result file under a directory
    /// @ai:effects fs:read
    pub fn analyze(&self, results_dir: &std::path::Path) -> Result<AnalysisOutcome> {
        let run = self.aggregator.aggregate(results_dir)?;
        let statistics = compute_all(&run.metrics);
        let comparisons = self.comparator.compare(&statistics, &self.baseline);

        tracing::info!(
            "Analyzed {} jobs from {}/{} files, {} metrics flagged",
            run.jobs_processed,
            run.files_loaded,
            run.files_discovered,
            comparisons.iter().filter(|c| c.flagged).count()
        );

        Ok(AnalysisOutcome {
            run,
            statistics,
            comparisons,
            stddev_threshold: self.stddev_threshold,
        })
    }
}
