//! @ai:module:intent Decoded fio result document and job record views
//! @ai:module:layer domain
//! @ai:module:public_api ResultDocument, JobRecord, IoSection, LatencyStats
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// @ai:intent Decoded content of one fio JSON output file
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResultDocument {
    #[serde(rename = "fio version", default)]
    pub fio_version: Option<String>,
    /// Raw job entries; each is validated on extraction so one bad job does
    /// not poison the whole file.
    #[serde(default)]
    pub jobs: Vec<Value>,
}

/// @ai:intent One workload's result; every field may be absent or null
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct JobRecord {
    pub jobname: Option<String>,
    pub read: Option<IoSection>,
    pub write: Option<IoSection>,
}

/// @ai:intent Read or write direction statistics of a job
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IoSection {
    pub io_bytes: Option<f64>,
    pub bw: Option<f64>,
    pub iops: Option<f64>,
    pub lat_ns: Option<LatencyStats>,
    pub clat_ns: Option<LatencyStats>,
}

/// @ai:intent Mean/stddev pair of a latency distribution
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LatencyStats {
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
}

impl JobRecord {
    /// @ai:intent Interpret a raw job entry as a job record
    /// @ai:pre value is a JSON object
    /// @ai:effects pure
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidRecord(format!(
                "expected an object, found {}",
                json_type_name(value)
            )));
        }

        JobRecord::deserialize(value).map_err(|e| Error::InvalidRecord(e.to_string()))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
