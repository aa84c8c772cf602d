//! @ai:module:intent Extract canonical metric sets from fio job records
//! @ai:module:layer domain
//! @ai:module:public_api extract, MetricSet::from_record
//! @ai:module:stateless true

use crate::error::Result;
use crate::metrics::types::{MetricName, MetricSet};
use crate::results::{IoSection, JobRecord, LatencyStats};
use serde_json::Value;

/// @ai:intent Extract a metric set from one raw job entry
/// @ai:pre job is a JSON object whose present fields are well-typed
/// @ai:post result holds every MetricName; absent fields are 0
/// @ai:effects pure
pub fn extract(job: &Value) -> Result<MetricSet> {
    let record = JobRecord::from_value(job)?;
    Ok(MetricSet::from_record(&record))
}

impl MetricSet {
    /// @ai:intent Flatten a decoded job record into canonical metrics
    /// @ai:effects pure
    pub fn from_record(job: &JobRecord) -> Self {
        let read = job.read.as_ref();
        let write = job.write.as_ref();

        MetricSet::from_values([
            (MetricName::ReadIoBytes, field(read, |s| s.io_bytes)),
            (MetricName::ReadBw, field(read, |s| s.bw)),
            (MetricName::ReadIops, field(read, |s| s.iops)),
            (MetricName::ReadLatencyMean, latency(read, |s| s.lat_ns.as_ref(), |l| l.mean)),
            (MetricName::ReadLatencyStddev, latency(read, |s| s.lat_ns.as_ref(), |l| l.stddev)),
            (MetricName::ReadClatMean, latency(read, |s| s.clat_ns.as_ref(), |l| l.mean)),
            (MetricName::ReadClatStddev, latency(read, |s| s.clat_ns.as_ref(), |l| l.stddev)),
            (MetricName::WriteIoBytes, field(write, |s| s.io_bytes)),
            (MetricName::WriteBw, field(write, |s| s.bw)),
            (MetricName::WriteIops, field(write, |s| s.iops)),
            (MetricName::WriteLatencyMean, latency(write, |s| s.lat_ns.as_ref(), |l| l.mean)),
            (MetricName::WriteLatencyStddev, latency(write, |s| s.lat_ns.as_ref(), |l| l.stddev)),
        ])
    }
}

fn field(section: Option<&IoSection>, get: impl Fn(&IoSection) -> Option<f64>) -> f64 {
    section.and_then(get).unwrap_or(0.0)
}

fn latency(
    section: Option<&IoSection>,
    stats: impl Fn(&IoSection) -> Option<&LatencyStats>,
    get: impl Fn(&LatencyStats) -> Option<f64>,
) -> f64 {
    section.and_then(stats).and_then(get).unwrap_or(0.0)
}
