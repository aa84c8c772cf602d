//! @ai:module:intent JSON report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter, JsonReport
//! @ai:module:stateless true

use crate::compare::ComparisonResult;
use crate::error::{Error, Result};
use crate::metrics::LoadFailure;
use crate::pipeline::AnalysisOutcome;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Serialized shape of a JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub timestamp: String,
    pub results_dir: PathBuf,
    pub stddev_threshold: f64,
    pub files_discovered: usize,
    pub files_loaded: usize,
    pub jobs_processed: usize,
    pub failures: Vec<LoadFailure>,
    pub comparisons: Vec<ComparisonResult>,
}

impl JsonReport {
    /// @ai:intent Snapshot an analysis outcome
    /// @ai:effects pure
    pub fn from_outcome(outcome: &AnalysisOutcome) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            results_dir: outcome.run.results_dir.clone(),
            stddev_threshold: outcome.stddev_threshold,
            files_discovered: outcome.run.files_discovered,
            files_loaded: outcome.run.files_loaded,
            jobs_processed: outcome.run.jobs_processed,
            failures: outcome.run.failures.clone(),
            comparisons: outcome.comparisons.clone(),
        }
    }
}

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Generate JSON report from an analysis outcome
    fn generate(&self, outcome: &AnalysisOutcome, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates JSON reports from analysis outcomes
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Generate JSON report to file
    /// @ai:effects fs:write
    fn generate(&self, outcome: &AnalysisOutcome, output_path: &Path) -> Result<()> {
        let report_write = |source| Error::ReportWrite {
            path: output_path.to_path_buf(),
            source,
        };

        let json = serde_json::to_string_pretty(&JsonReport::from_outcome(outcome))
            .map_err(|e| report_write(std::io::Error::other(e)))?;
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(report_write)?;
        }
        std::fs::write(output_path, json).map_err(report_write)?;
        Ok(())
    }
}
