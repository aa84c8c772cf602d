//! @ai:module:intent Define error types for the storbench analysis pipeline
//! @ai:module:layer domain
//! @ai:module:public_api Error, ErrorKind, Result
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all pipeline operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Path not found or unreadable {path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed result file {path}: {message}")]
    MalformedInput { path: PathBuf, message: String },

    #[error("Invalid job record: {0}")]
    InvalidRecord(String),

    #[error("Failed to write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// @ai:intent Project an error onto its taxonomy kind
    /// @ai:effects pure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::MalformedInput { .. } => ErrorKind::MalformedInput,
            Error::InvalidRecord(_) => ErrorKind::InvalidRecord,
            Error::ReportWrite { .. } => ErrorKind::ReportWrite,
            Error::Config(_) => ErrorKind::Config,
        }
    }
}

/// @ai:intent Error category recorded for skipped files and jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    MalformedInput,
    InvalidRecord,
    ReportWrite,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::InvalidRecord => "invalid_record",
            ErrorKind::ReportWrite => "report_write",
            ErrorKind::Config => "config",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
