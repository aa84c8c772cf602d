//! @ai:module:intent Metric types for fio result analysis
//! @ai:module:layer domain
//! @ai:module:public_api MetricName, MetricSet, AggregatedMetrics, Statistic
//! @ai:module:stateless true

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// @ai:intent Recognized metric names, declared in canonical order
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    ReadIoBytes,
    ReadBw,
    ReadIops,
    ReadLatencyMean,
    ReadLatencyStddev,
    ReadClatMean,
    ReadClatStddev,
    WriteIoBytes,
    WriteBw,
    WriteIops,
    WriteLatencyMean,
    WriteLatencyStddev,
}

impl MetricName {
    /// Every recognized metric, in canonical order.
    pub const ALL: [MetricName; 12] = [
        MetricName::ReadIoBytes,
        MetricName::ReadBw,
        MetricName::ReadIops,
        MetricName::ReadLatencyMean,
        MetricName::ReadLatencyStddev,
        MetricName::ReadClatMean,
        MetricName::ReadClatStddev,
        MetricName::WriteIoBytes,
        MetricName::WriteBw,
        MetricName::WriteIops,
        MetricName::WriteLatencyMean,
        MetricName::WriteLatencyStddev,
    ];

    /// Metrics aggregated and reported when nothing else is configured.
    pub const DEFAULT_TRACKED: [MetricName; 6] = [
        MetricName::ReadBw,
        MetricName::ReadIops,
        MetricName::ReadLatencyMean,
        MetricName::ReadLatencyStddev,
        MetricName::WriteBw,
        MetricName::WriteIops,
    ];

    /// @ai:intent Convert metric name to its report/config spelling
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::ReadIoBytes => "read_io_bytes",
            MetricName::ReadBw => "read_bw",
            MetricName::ReadIops => "read_iops",
            MetricName::ReadLatencyMean => "read_latency_mean",
            MetricName::ReadLatencyStddev => "read_latency_stddev",
            MetricName::ReadClatMean => "read_clat_mean",
            MetricName::ReadClatStddev => "read_clat_stddev",
            MetricName::WriteIoBytes => "write_io_bytes",
            MetricName::WriteBw => "write_bw",
            MetricName::WriteIops => "write_iops",
            MetricName::WriteLatencyMean => "write_latency_mean",
            MetricName::WriteLatencyStddev => "write_latency_stddev",
        }
    }
}

impl std::fmt::Display for MetricName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetricName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::Config(format!("unknown metric name: {}", s)))
    }
}

/// @ai:intent Canonical flat metric values for one job
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSet {
    values: BTreeMap<MetricName, f64>,
}

impl MetricSet {
    /// @ai:intent Build a set from explicit values; any metric left out is zero
    /// @ai:effects pure
    pub fn from_values<I: IntoIterator<Item = (MetricName, f64)>>(values: I) -> Self {
        let mut set = Self::default();
        for (name, value) in values {
            set.values.insert(name, value);
        }
        set
    }

    /// @ai:intent Value for a metric (always present)
    /// @ai:effects pure
    pub fn get(&self, name: MetricName) -> f64 {
        self.values.get(&name).copied().unwrap_or(0.0)
    }

    /// @ai:intent Iterate values in canonical metric order
    /// @ai:effects pure
    pub fn iter(&self) -> impl Iterator<Item = (MetricName, f64)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for MetricSet {
    fn default() -> Self {
        Self {
            values: MetricName::ALL.iter().map(|name| (*name, 0.0)).collect(),
        }
    }
}

/// @ai:intent Per-metric observation sequences accumulated across a run
/// @ai:invariant series order is the tracked-metric order given at construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedMetrics {
    series: Vec<(MetricName, Vec<f64>)>,
}

impl AggregatedMetrics {
    /// @ai:intent Create empty sequences for the tracked metrics, dropping duplicates
    /// @ai:effects pure
    pub fn new(tracked: &[MetricName]) -> Self {
        let mut series: Vec<(MetricName, Vec<f64>)> = Vec::with_capacity(tracked.len());
        for name in tracked {
            if !series.iter().any(|(existing, _)| existing == name) {
                series.push((*name, Vec::new()));
            }
        }
        Self { series }
    }

    /// @ai:intent Append one job's values to every tracked sequence
    /// @ai:effects mutates self
    pub fn push(&mut self, set: &MetricSet) {
        for (name, values) in &mut self.series {
            values.push(set.get(*name));
        }
    }

    /// @ai:intent Append another accumulator's sequences after this one's
    /// @ai:pre other tracks the same metrics
    /// @ai:effects mutates self
    pub fn extend(&mut self, other: AggregatedMetrics) {
        for (name, values) in other.series {
            if let Some((_, target)) = self.series.iter_mut().find(|(n, _)| *n == name) {
                target.extend(values);
            }
        }
    }

    pub fn get(&self, name: MetricName) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricName, &[f64])> + '_ {
        self.series
            .iter()
            .map(|(name, values)| (*name, values.as_slice()))
    }

    pub fn names(&self) -> Vec<MetricName> {
        self.series.iter().map(|(name, _)| *name).collect()
    }

    /// @ai:intent Number of jobs folded in so far
    /// @ai:effects pure
    pub fn observations(&self) -> usize {
        self.series
            .first()
            .map(|(_, values)| values.len())
            .unwrap_or(0)
    }
}

/// @ai:intent Mean and population standard deviation for one metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub mean: f64,
    pub stddev: f64,
}
