//! @ai:module:intent Configuration structs for the analysis pipeline
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnalysisConfig, PathConfig, DiscoveryConfig, AnalysisSettings
//! @ai:module:stateless true

use crate::compare::BaselineProfile;
use crate::error::Error;
use crate::metrics::MetricName;
use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Main configuration for one analysis run
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default = "BaselineProfile::reference")]
    pub baseline: BaselineProfile,
}

/// @ai:intent Input directory and output artifact locations
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    #[serde(default = "default_report_file")]
    pub report_file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_report: Option<PathBuf>,
}

/// @ai:intent Which files in the results directory are result documents
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_pattern: Option<String>,
    #[serde(default)]
    pub parallel: bool,
}

/// @ai:intent Threshold and tracked metrics for the comparison
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_stddev_threshold")]
    pub stddev_threshold: f64,
    #[serde(default = "default_metrics")]
    pub metrics: Vec<MetricName>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            paths: PathConfig::default(),
            discovery: DiscoveryConfig::default(),
            analysis: AnalysisSettings::default(),
            baseline: BaselineProfile::reference(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            report_file: default_report_file(),
            json_report: None,
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            recursive: false,
            include_pattern: None,
            parallel: false,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            stddev_threshold: default_stddev_threshold(),
            metrics: default_metrics(),
        }
    }
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_report_file() -> PathBuf {
    PathBuf::from("perfio-storbench.comp-report.out")
}

fn default_extension() -> String {
    "json".to_string()
}

fn default_stddev_threshold() -> f64 {
    50.0
}

fn default_metrics() -> Vec<MetricName> {
    MetricName::DEFAULT_TRACKED.to_vec()
}

impl AnalysisConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// @ai:intent Reject settings the pipeline cannot run with
    /// @ai:effects pure
    pub fn validate(&self) -> crate::Result<()> {
        let threshold = self.analysis.stddev_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::Config(format!(
                "stddev_threshold must be a non-negative number, got {}",
                threshold
            )));
        }

        if self.analysis.metrics.is_empty() {
            return Err(Error::Config("no metrics selected for analysis".to_string()));
        }

        if self.discovery.extension.trim_start_matches('.').is_empty() {
            return Err(Error::Config("discovery extension must not be empty".to_string()));
        }

        self.discovery.include_regex()?;

        for key in self.baseline.unrecognized_keys() {
            tracing::warn!("Ignoring baseline entry for unknown metric '{}'", key);
        }

        Ok(())
    }
}

impl DiscoveryConfig {
    /// @ai:intent Compile the optional file-name filter
    /// @ai:effects pure
    pub fn include_regex(&self) -> crate::Result<Option<Regex>> {
        self.include_pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    Error::Config(format!("invalid include_pattern '{}': {}", pattern, e))
                })
            })
            .transpose()
    }

    /// @ai:intent Extension without a leading dot
    /// @ai:effects pure
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}
