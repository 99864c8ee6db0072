//! Heuristic data-quality evaluation.
//!
//! Advisory component: threshold checks over the whole dataset, yielding a
//! metrics report plus warning strings. Never errors; an empty dataset
//! degrades to `Unavailable`.

use crate::frame::FrameDataset;
use crate::stats::message_frequency;
use serde::{Deserialize, Serialize};

/// Tunable thresholds for the quality checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// A consecutive delta strictly below this counts as "short" (seconds).
    pub short_interval_threshold: f64,
    /// A frame with DLC strictly above this counts as over-length.
    pub max_length: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            short_interval_threshold: 0.01,
            max_length: 8,
        }
    }
}

/// Computed quality metrics and derived warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_messages: usize,
    pub unique_identifier_count: usize,
    pub short_interval_count: usize,
    pub over_length_count: usize,
    pub warnings: Vec<String>,
}

/// Outcome of the quality evaluation. Advisory, so an empty dataset yields
/// `Unavailable` rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "report", rename_all = "snake_case")]
pub enum QualityEvaluation {
    Unavailable,
    Report(QualityReport),
}

impl QualityEvaluation {
    pub fn report(&self) -> Option<&QualityReport> {
        match self {
            QualityEvaluation::Report(r) => Some(r),
            QualityEvaluation::Unavailable => None,
        }
    }
}

/// Evaluate dataset quality against the configured thresholds.
pub fn evaluate_quality(dataset: &FrameDataset, config: &QualityConfig) -> QualityEvaluation {
    let total_messages = dataset.len();
    if total_messages == 0 {
        tracing::debug!("quality evaluation unavailable: empty dataset");
        return QualityEvaluation::Unavailable;
    }

    let short_interval_count = dataset
        .sorted_deltas()
        .iter()
        .filter(|&&d| d < config.short_interval_threshold)
        .count();

    let over_length_count = dataset
        .iter()
        .filter(|f| f.length > config.max_length)
        .count();

    let mut warnings = Vec::new();
    if short_interval_count as f64 / total_messages as f64 > 0.1 {
        warnings.push("High frequency of short intervals".to_string());
    }
    if over_length_count > 0 {
        warnings.push("Out-of-range length values detected".to_string());
    }

    QualityEvaluation::Report(QualityReport {
        total_messages,
        unique_identifier_count: message_frequency(dataset).len(),
        short_interval_count,
        over_length_count,
        warnings,
    })
}
