//! @ai:module:intent Compare computed statistics against a static baseline
//! @ai:module:layer domain
//! @ai:module:public_api BaselineProfile, BaselineValue, ComparisonResult, BaselineComparator
//! @ai:module:stateless true

use crate::metrics::{MetricName, Statistic};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// @ai:intent Expected reference value, keeping the integer/float spelling it was configured with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaselineValue {
    Integer(i64),
    Float(f64),
}

impl BaselineValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            BaselineValue::Integer(v) => *v as f64,
            BaselineValue::Float(v) => *v,
        }
    }
}

impl std::fmt::Display for BaselineValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaselineValue::Integer(v) => write!(f, "{}", v),
            BaselineValue::Float(v) if !v.is_finite() => write!(f, "{}", v),
            BaselineValue::Float(v) if uses_exponent(*v) => write!(f, "{}", exponent_form(*v)),
            BaselineValue::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            BaselineValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Floats outside [1e-4, 1e16) are written in exponent form.
fn uses_exponent(v: f64) -> bool {
    let magnitude = v.abs();
    magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude)
}

/// Shortest mantissa with a signed, two-digit-minimum exponent: `1e-07`, `1.5e+20`.
fn exponent_form(v: f64) -> String {
    let formatted = format!("{:e}", v);
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}

impl From<i64> for BaselineValue {
    fn from(v: i64) -> Self {
        BaselineValue::Integer(v)
    }
}

impl From<f64> for BaselineValue {
    fn from(v: f64) -> Self {
        BaselineValue::Float(v)
    }
}

/// @ai:intent Metric name to expected reference average
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaselineProfile {
    values: BTreeMap<String, BaselineValue>,
}

impl BaselineProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Set the expected value for a metric
    /// @ai:effects mutates self
    pub fn insert(&mut self, name: MetricName, value: impl Into<BaselineValue>) {
        self.values.insert(name.as_str().to_string(), value.into());
    }

    pub fn get(&self, name: MetricName) -> Option<BaselineValue> {
        self.values.get(name.as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// @ai:intent Keys that do not name a recognized metric
    /// @ai:effects pure
    pub fn unrecognized_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .filter(|key| key.parse::<MetricName>().is_err())
            .map(String::as_str)
            .collect()
    }

    /// @ai:intent Reference profile used when no baseline is configured
    /// @ai:effects pure
    pub fn reference() -> Self {
        let mut profile = Self::new();
        profile.insert(MetricName::ReadBw, 20_020_544_i64);
        profile.insert(MetricName::ReadIops, 5_005_136.04);
        profile.insert(MetricName::ReadLatencyMean, 37.0);
        profile.insert(MetricName::ReadLatencyStddev, 43.0);
        profile.insert(MetricName::WriteBw, 0_i64);
        profile.insert(MetricName::WriteIops, 0_i64);
        profile.insert(MetricName::WriteLatencyMean, 0_i64);
        profile.insert(MetricName::WriteLatencyStddev, 0_i64);
        profile
    }
}

/// @ai:intent Verdict for one metric of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub metric: MetricName,
    pub test_avg: f64,
    pub test_stddev: f64,
    /// `None` when the metric has no baseline entry; distinct from a zero baseline.
    pub baseline: Option<BaselineValue>,
    pub flagged: bool,
}

/// @ai:intent Trait for baseline comparison
pub trait BaselineComparatorTrait: Send + Sync {
    /// @ai:intent Produce one verdict per metric, preserving input order
    fn compare(
        &self,
        stats: &[(MetricName, Statistic)],
        baseline: &BaselineProfile,
    ) -> Vec<ComparisonResult>;
}

/// @ai:intent Flags metrics whose observed stddev reaches the threshold
pub struct BaselineComparator {
    stddev_threshold: f64,
}

impl BaselineComparator {
    /// @ai:intent Create a comparator with an inclusive stddev threshold
    /// @ai:effects pure
    pub fn new(stddev_threshold: f64) -> Self {
        Self { stddev_threshold }
    }

    pub fn stddev_threshold(&self) -> f64 {
        self.stddev_threshold
    }

    /// @ai:intent Verdict for a single metric
    /// @ai:effects pure
    pub fn compare_one(
        &self,
        metric: MetricName,
        stat: &Statistic,
        baseline: &BaselineProfile,
    ) -> ComparisonResult {
        ComparisonResult {
            metric,
            test_avg: stat.mean,
            test_stddev: stat.stddev,
            baseline: baseline.get(metric),
            flagged: stat.stddev >= self.stddev_threshold,
        }
    }
}

impl BaselineComparatorTrait for BaselineComparator {
    fn compare(
        &self,
        stats: &[(MetricName, Statistic)],
        baseline: &BaselineProfile,
    ) -> Vec<ComparisonResult> {
        stats
            .iter()
            .map(|(metric, stat)| self.compare_one(*metric, stat, baseline))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stat(mean: f64, stddev: f64) -> Statistic {
        Statistic { mean, stddev }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let comparator = BaselineComparator::new(50.0);
        let profile = BaselineProfile::new();

        let below = comparator.compare_one(MetricName::ReadBw, &stat(1.0, 49.999), &profile);
        let at = comparator.compare_one(MetricName::ReadBw, &stat(1.0, 50.0), &profile);
        assert!(!below.flagged);
        assert!(at.flagged);
    }

    #[test]
    fn test_flag_ignores_baseline_average() {
        let comparator = BaselineComparator::new(50.0);
        let mut profile = BaselineProfile::new();
        profile.insert(MetricName::ReadIops, 10_i64);

        let result = comparator.compare_one(MetricName::ReadIops, &stat(999_999.0, 1.0), &profile);
        assert!(!result.flagged);
    }

    #[test]
    fn test_unknown_baseline_differs_from_zero() {
        let comparator = BaselineComparator::new(50.0);
        let mut profile = BaselineProfile::new();
        profile.insert(MetricName::WriteBw, 0_i64);

        let results = comparator.compare(
            &[
                (MetricName::WriteBw, stat(0.0, 0.0)),
                (MetricName::ReadClatMean, stat(0.0, 0.0)),
            ],
            &profile,
        );

        assert_eq!(results[0].baseline, Some(BaselineValue::Integer(0)));
        assert_eq!(results[1].baseline, None);
    }

    #[test]
    fn test_compare_preserves_order() {
        let comparator = BaselineComparator::new(1.0);
        let results = comparator.compare(
            &[
                (MetricName::WriteIops, stat(1.0, 0.0)),
                (MetricName::ReadBw, stat(2.0, 3.0)),
            ],
            &BaselineProfile::reference(),
        );

        let names: Vec<_> = results.iter().map(|r| r.metric).collect();
        assert_eq!(names, vec![MetricName::WriteIops, MetricName::ReadBw]);
        assert!(results[1].flagged);
    }

    #[test]
    fn test_baseline_value_renders_verbatim() {
        assert_eq!(BaselineValue::Integer(2000).to_string(), "2000");
        assert_eq!(BaselineValue::Float(37.0).to_string(), "37.0");
        assert_eq!(BaselineValue::Float(5_005_136.04).to_string(), "5005136.04");
        assert_eq!(BaselineValue::Float(0.0).to_string(), "0.0");
        assert_eq!(BaselineValue::Float(0.0001).to_string(), "0.0001");
    }

    #[test]
    fn test_baseline_value_uses_exponent_outside_plain_range() {
        assert_eq!(BaselineValue::Float(1e-7).to_string(), "1e-07");
        assert_eq!(BaselineValue::Float(1e20).to_string(), "1e+20");
        assert_eq!(BaselineValue::Float(-1.5e20).to_string(), "-1.5e+20");
        assert_eq!(BaselineValue::Float(2.5e-123).to_string(), "2.5e-123");
        assert_eq!(BaselineValue::Float(1e16).to_string(), "1e+16");
        assert_eq!(BaselineValue::Float(9_999_999_999_999_998.0).to_string(), "9999999999999998.0");
    }

    #[test]
    fn test_unrecognized_baseline_keys() {
        let profile: BaselineProfile =
            toml::from_str("read_bw = 1\nread_speed = 2.5\n").unwrap();
        assert_eq!(profile.unrecognized_keys(), vec!["read_speed"]);
        assert_eq!(profile.get(MetricName::ReadBw), Some(BaselineValue::Integer(1)));
    }
}
