//! @ai:module:intent Report generation for analysis outcomes
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, TextReporter, JsonReporter

pub mod json_report;
pub mod text_report;

pub use json_report::{JsonReport, JsonReporter, JsonReporterTrait};
pub use text_report::{TextReporter, TextReporterTrait, UNKNOWN_BASELINE};

use crate::config::PathConfig;
use crate::error::Result;
use crate::pipeline::AnalysisOutcome;

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    text: TextReporter,
    json: JsonReporter,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            text: TextReporter::new(),
            json: JsonReporter::new(),
        }
    }

    /// @ai:intent Write the text report and, if configured, the JSON report
    /// @ai:effects fs:write
    pub fn generate_all(&self, outcome: &AnalysisOutcome, paths: &PathConfig) -> Result<()> {
        self.text.generate(&outcome.comparisons, &paths.report_file)?;
        tracing::info!("Comparison report written to {}", paths.report_file.display());

        if let Some(json_path) = &paths.json_report {
            self.json.generate(outcome, json_path)?;
            tracing::info!("JSON report written to {}", json_path.display());
        }

        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
