//! @ai:module:intent Plain-text comparison report
//! @ai:module:layer infrastructure
//! @ai:module:public_api TextReporter
//! @ai:module:stateless true

use crate::compare::ComparisonResult;
use crate::error::{Error, Result};
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// Rendered in place of a baseline the profile does not define.
pub const UNKNOWN_BASELINE: &str = "unknown";

/// @ai:intent Trait for text report generation
pub trait TextReporterTrait: Send + Sync {
    /// @ai:intent Write the text report for a set of comparison results
    fn generate(&self, results: &[ComparisonResult], output_path: &Path) -> Result<()>;
}

/// @ai:intent Renders one line per metric in result order
pub struct TextReporter;

impl TextReporter {
    /// @ai:intent Create a new text reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Render a single report line (no trailing newline)
    /// @ai:effects pure
    pub fn format_line(result: &ComparisonResult) -> String {
        let baseline = result
            .baseline
            .map(|b| b.to_string())
            .unwrap_or_else(|| UNKNOWN_BASELINE.to_string());
        let flagged = if result.flagged { "True" } else { "False" };

        format!(
            "{}: Test Avg = {:.2}, Test STDDEV = {:.2}, Baseline = {}, Flagged = {}",
            result.metric, result.test_avg, result.test_stddev, baseline, flagged
        )
    }

    /// @ai:intent Render the whole report
    /// @ai:effects pure
    pub fn render(results: &[ComparisonResult]) -> String {
        let mut output = String::new();
        for result in results {
            writeln!(output, "{}", Self::format_line(result)).unwrap();
        }
        output
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextReporterTrait for TextReporter {
    /// @ai:intent Write the report, creating parent directories
    /// @ai:effects fs:write
    fn generate(&self, results: &[ComparisonResult], output_path: &Path) -> Result<()> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(output_path, Self::render(results))
        };

        write().map_err(|source| Error::ReportWrite {
            path: output_path.to_path_buf(),
            source,
        })
    }
}
