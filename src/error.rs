//! Error types for the analytics engine and log ingestion.

use thiserror::Error;

/// Errors from the analytics components.
///
/// Structural failures are surfaced as typed variants rather than coerced to
/// zero or NaN; advisory components (quality, diagnostics) never produce
/// these and degrade to an `Unavailable` result instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Empty dataset: statistics are undefined with no frames")]
    EmptyDataset,

    #[error("Insufficient data: need at least {required} frames, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid time range: start ({start}) must be <= end ({end}) and finite")]
    InvalidRange { start: f64, end: f64 },
}

/// Errors from CAN log ingestion.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed frame at line {line}: {reason}")]
    MalformedFrame { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
