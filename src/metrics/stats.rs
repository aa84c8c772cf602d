//! @ai:module:intent Descriptive statistics over metric sequences
//! @ai:module:layer domain
//! @ai:module:public_api compute_statistics, compute_all
//! @ai:module:stateless true

use crate::metrics::types::{AggregatedMetrics, MetricName, Statistic};

/// @ai:intent Mean and population standard deviation of a sequence
/// @ai:post empty input yields exactly (0, 0), never NaN
/// @ai:effects pure
pub fn compute_statistics(values: &[f64]) -> Statistic {
    if values.is_empty() {
        return Statistic::default();
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    // Population variance: divide by N, not N - 1.
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    Statistic {
        mean,
        stddev: variance.sqrt(),
    }
}

/// @ai:intent Compute a statistic for every tracked metric, in tracked order
/// @ai:effects pure
pub fn compute_all(metrics: &AggregatedMetrics) -> Vec<(MetricName, Statistic)> {
    metrics
        .iter()
        .map(|(name, values)| (name, compute_statistics(values)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::MetricSet;

    #[test]
    fn test_empty_sequence_is_zero_sentinel() {
        let stat = compute_statistics(&[]);
        assert_eq!(stat.mean, 0.0);
        assert_eq!(stat.stddev, 0.0);
    }

    #[test]
    fn test_population_stddev() {
        let stat = compute_statistics(&[1000.0, 3000.0]);
        assert!((stat.mean - 2000.0).abs() < 1e-9);
        assert!((stat.stddev - 1000.0).abs() < 1e-9);

        let stat = compute_statistics(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((stat.mean - 5.0).abs() < 1e-9);
        assert!((stat.stddev - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_value_has_zero_stddev() {
        let stat = compute_statistics(&[42.5]);
        assert_eq!(stat.mean, 42.5);
        assert_eq!(stat.stddev, 0.0);
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = compute_statistics(&[1.5, 10.0, 3.25, 8.0]);
        let b = compute_statistics(&[8.0, 3.25, 1.5, 10.0]);
        assert!((a.mean - b.mean).abs() < 1e-9);
        assert!((a.stddev - b.stddev).abs() < 1e-9);
    }

    #[test]
    fn test_compute_all_follows_tracked_order() {
        let mut agg = AggregatedMetrics::new(&[MetricName::WriteIops, MetricName::ReadBw]);
        agg.push(&MetricSet::from_values([(MetricName::ReadBw, 4.0)]));

        let stats = compute_all(&agg);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].0, MetricName::WriteIops);
        assert_eq!(stats[1], (MetricName::ReadBw, Statistic { mean: 4.0, stddev: 0.0 }));
    }
}
