//! Rule-based diagnostic advisories.
//!
//! Independent of the quality report: each rule reads the shared dataset and
//! appends human-readable advisories in a fixed order. Advisory path, so an
//! empty dataset degrades to `Unavailable` instead of erroring.

use crate::frame::FrameDataset;
use crate::stats::message_frequency;
use serde::{Deserialize, Serialize};

/// Tunable thresholds for the diagnostic rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// An identifier seen strictly more often than this is flagged.
    pub frequency_threshold: u64,
    /// A max consecutive delta strictly above this (seconds) is flagged.
    pub gap_threshold: f64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            frequency_threshold: 3,
            gap_threshold: 0.2,
        }
    }
}

/// Outcome of diagnostics generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "advisories", rename_all = "snake_case")]
pub enum DiagnosticsOutcome {
    Unavailable,
    Advisories(Vec<String>),
}

impl DiagnosticsOutcome {
    pub fn advisories(&self) -> Option<&[String]> {
        match self {
            DiagnosticsOutcome::Advisories(a) => Some(a),
            DiagnosticsOutcome::Unavailable => None,
        }
    }
}

/// Run the diagnostic rules in order: high-frequency identifiers, suspect
/// short DLC, large timing gap.
pub fn generate_diagnostics(
    dataset: &FrameDataset,
    config: &DiagnosticsConfig,
) -> DiagnosticsOutcome {
    if dataset.is_empty() {
        tracing::debug!("diagnostics unavailable: empty dataset");
        return DiagnosticsOutcome::Unavailable;
    }

    let mut advisories = Vec::new();

    // Rule 1: identifiers appearing unusually often. The frequency table is
    // a BTreeMap, so the advisory order is stable across runs.
    for (identifier, count) in message_frequency(dataset) {
        if count > config.frequency_threshold {
            advisories.push(format!(
                "Identifier {identifier} appears {count} times, unusually high"
            ));
        }
    }

    // Rule 2: short DLC values suggest truncated or corrupted frames.
    if dataset.iter().any(|f| f.length < 2) {
        advisories.push(
            "Frames with length < 2 detected, possible data corruption".to_string(),
        );
    }

    // Rule 3: large gap between consecutive messages.
    let max_gap = dataset
        .sorted_deltas()
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);
    if max_gap.is_finite() && max_gap > config.gap_threshold {
        advisories.push(format!(
            "Large time gap of {max_gap:.3}s between messages, possible communication issue"
        ));
    }

    DiagnosticsOutcome::Advisories(advisories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    fn dataset(frames: Vec<Frame>) -> FrameDataset {
        FrameDataset::new(frames)
    }

    #[test]
    fn test_empty_dataset_is_unavailable() {
        let outcome = generate_diagnostics(&FrameDataset::default(), &DiagnosticsConfig::default());
        assert_eq!(outcome, DiagnosticsOutcome::Unavailable);
    }

    #[test]
    fn test_quiet_dataset_has_no_advisories() {
        let d = dataset(
            (0..3)
                .map(|i| Frame::new(i as f64 * 0.1, format!("0x{i}"), 8))
                .collect(),
        );
        let outcome = generate_diagnostics(&d, &DiagnosticsConfig::default());
        assert_eq!(outcome.advisories().unwrap().len(), 0);
    }

    #[test]
    fn test_high_frequency_identifier_flagged() {
        let d = dataset(
            (0..5)
                .map(|i| Frame::new(i as f64 * 0.05, "0x7ff", 8))
                .collect(),
        );
        let outcome = generate_diagnostics(&d, &DiagnosticsConfig::default());
        let advisories = outcome.advisories().unwrap();
        assert_eq!(advisories.len(), 1);
        assert!(advisories[0].contains("0x7ff"));
        assert!(advisories[0].contains("5 times"));
    }

    #[test]
    fn test_frequency_exactly_at_threshold_not_flagged() {
        // Threshold is strict: 3 occurrences with threshold 3 stays quiet.
        let d = dataset(
            (0..3)
                .map(|i| Frame::new(i as f64 * 0.05, "0x100", 8))
                .collect(),
        );
        let outcome = generate_diagnostics(&d, &DiagnosticsConfig::default());
        assert!(outcome.advisories().unwrap().is_empty());
    }

    #[test]
    fn test_short_length_flagged_once() {
        let d = dataset(vec![
            Frame::new(0.0, "A", 1),
            Frame::new(0.05, "B", 0),
            Frame::new(0.10, "C", 8),
        ]);
        let outcome = generate_diagnostics(&d, &DiagnosticsConfig::default());
        let advisories = outcome.advisories().unwrap();
        let corruption: Vec<_> = advisories
            .iter()
            .filter(|a| a.contains("corruption"))
            .collect();
        assert_eq!(corruption.len(), 1);
    }

    #[test]
    fn test_over_length_not_a_diagnostic() {
        // Length > 8 is the quality evaluator's territory.
        let d = dataset(vec![Frame::new(0.0, "A", 12), Frame::new(0.05, "B", 8)]);
        let outcome = generate_diagnostics(&d, &DiagnosticsConfig::default());
        assert!(outcome.advisories().unwrap().is_empty());
    }

    #[test]
    fn test_large_gap_flagged() {
        let d = dataset(vec![
            Frame::new(0.0, "A", 8),
            Frame::new(0.05, "B", 8),
            Frame::new(0.50, "C", 8),
        ]);
        let outcome = generate_diagnostics(&d, &DiagnosticsConfig::default());
        let advisories = outcome.advisories().unwrap();
        assert_eq!(advisories.len(), 1);
        assert!(advisories[0].contains("time gap"));
        assert!(advisories[0].contains("0.450"));
    }

    #[test]
    fn test_rule_order_is_stable() {
        let mut frames: Vec<Frame> = (0..4).map(|i| Frame::new(i as f64 * 0.05, "0x2", 8)).collect();
        frames.extend((0..4).map(|i| Frame::new(0.2 + i as f64 * 0.05, "0x1", 8)));
        frames.push(Frame::new(1.0, "0x3", 1));
        let outcome = generate_diagnostics(&dataset(frames), &DiagnosticsConfig::default());
        let advisories = outcome.advisories().unwrap();
        // BTreeMap order: 0x1 before 0x2; then corruption; then gap.
        assert!(advisories[0].contains("0x1"));
        assert!(advisories[1].contains("0x2"));
        assert!(advisories[2].contains("corruption"));
        assert!(advisories[3].contains("time gap"));
    }

    #[test]
    fn test_custom_gap_threshold() {
        let d = dataset(vec![Frame::new(0.0, "A", 8), Frame::new(0.1, "B", 8)]);
        let relaxed = DiagnosticsConfig::default();
        assert!(generate_diagnostics(&d, &relaxed)
            .advisories()
            .unwrap()
            .is_empty());

        let strict = DiagnosticsConfig {
            gap_threshold: 0.05,
            ..Default::default()
        };
        assert_eq!(
            generate_diagnostics(&d, &strict).advisories().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_single_frame_has_no_gap_rule() {
        let d = dataset(vec![Frame::new(0.0, "A", 8)]);
        let outcome = generate_diagnostics(&d, &DiagnosticsConfig::default());
        assert!(outcome.advisories().unwrap().is_empty());
    }
}
