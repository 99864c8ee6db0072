//! Aggregate statistics over a frame dataset.
//!
//! Covers the message totals, the per-identifier frequency table, and the
//! inter-message interval distribution. Scalar kernels (mean, stddev, min,
//! max) go through Trueno for SIMD acceleration.

use crate::error::{AnalysisError, Result};
use crate::frame::FrameDataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-identifier occurrence counts. Keys are the distinct identifiers in
/// the dataset; counts always sum to the dataset size. A BTreeMap keeps
/// report output and diagnostics iteration deterministic.
pub type FrequencyTable = BTreeMap<String, u64>;

/// Headline dataset statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_messages: usize,
    pub unique_identifier_count: usize,
    /// Arithmetic mean of DLC across all frames.
    pub average_length: f64,
}

/// Distribution of consecutive-timestamp deltas (after a stable sort by
/// timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
}

/// Compute headline statistics.
///
/// Fails with `EmptyDataset` rather than dividing by zero for the average.
pub fn calculate_statistics(dataset: &FrameDataset) -> Result<Statistics> {
    if dataset.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let lengths: Vec<f32> = dataset.iter().map(|f| f.length as f32).collect();
    let average_length = trueno::Vector::from_slice(&lengths).mean().unwrap_or(0.0) as f64;

    Ok(Statistics {
        total_messages: dataset.len(),
        unique_identifier_count: message_frequency(dataset).len(),
        average_length,
    })
}

/// Count occurrences per identifier.
pub fn message_frequency(dataset: &FrameDataset) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for frame in dataset {
        *table.entry(frame.identifier.clone()).or_insert(0) += 1;
    }
    table
}

/// Compute the inter-message interval distribution.
///
/// The dataset is stably sorted by timestamp before differencing, so the
/// delta sequence is well defined for unsorted logs. Needs at least two
/// frames; fails with `InsufficientData` otherwise.
pub fn calculate_interval_statistics(dataset: &FrameDataset) -> Result<IntervalStats> {
    if dataset.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            required: 2,
            actual: dataset.len(),
        });
    }

    let deltas: Vec<f32> = dataset.sorted_deltas().iter().map(|&d| d as f32).collect();
    let v = trueno::Vector::from_slice(&deltas);

    Ok(IntervalStats {
        min: v.min().unwrap_or(0.0) as f64,
        max: v.max().unwrap_or(0.0) as f64,
        mean: v.mean().unwrap_or(0.0) as f64,
        stddev: v.stddev().unwrap_or(0.0) as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;

    fn sample_dataset() -> FrameDataset {
        FrameDataset::new(vec![
            Frame::new(0.001, "A", 8),
            Frame::new(0.002, "B", 4),
            Frame::new(0.003, "A", 8),
        ])
    }

    #[test]
    fn test_calculate_statistics_sample() {
        let stats = calculate_statistics(&sample_dataset()).unwrap();
        assert_eq!(stats.total_messages, 3);
        assert_eq!(stats.unique_identifier_count, 2);
        assert!((stats.average_length - 6.667).abs() < 1e-3);
    }

    #[test]
    fn test_calculate_statistics_empty_fails() {
        let err = calculate_statistics(&FrameDataset::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyDataset));
    }

    #[test]
    fn test_message_frequency_counts() {
        let table = message_frequency(&sample_dataset());
        assert_eq!(table.get("A"), Some(&2));
        assert_eq!(table.get("B"), Some(&1));
    }

    #[test]
    fn test_frequency_sums_to_total() {
        let dataset = sample_dataset();
        let table = message_frequency(&dataset);
        let sum: u64 = table.values().sum();
        assert_eq!(sum as usize, dataset.len());
    }

    #[test]
    fn test_frequency_empty_dataset() {
        assert!(message_frequency(&FrameDataset::default()).is_empty());
    }

    #[test]
    fn test_interval_statistics_sample() {
        // Deltas [0.001, 0.001]: min = max = mean, zero variance.
        let stats = calculate_interval_statistics(&sample_dataset()).unwrap();
        assert!((stats.min - 0.001).abs() < 1e-6);
        assert!((stats.max - 0.001).abs() < 1e-6);
        assert!((stats.mean - 0.001).abs() < 1e-6);
        assert!(stats.stddev.abs() < 1e-6);
    }

    #[test]
    fn test_interval_statistics_unsorted_input() {
        let dataset = FrameDataset::new(vec![
            Frame::new(0.010, "A", 8),
            Frame::new(0.001, "B", 8),
            Frame::new(0.004, "C", 8),
        ]);
        let stats = calculate_interval_statistics(&dataset).unwrap();
        // Sorted timestamps [0.001, 0.004, 0.010] -> deltas [0.003, 0.006]
        assert!((stats.min - 0.003).abs() < 1e-6);
        assert!((stats.max - 0.006).abs() < 1e-6);
    }

    #[test]
    fn test_interval_statistics_needs_two_frames() {
        let single = FrameDataset::new(vec![Frame::new(0.001, "A", 8)]);
        let err = calculate_interval_statistics(&single).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData {
                required: 2,
                actual: 1
            }
        ));

        assert!(calculate_interval_statistics(&FrameDataset::default()).is_err());
    }

    #[test]
    fn test_interval_ordering_invariant() {
        let dataset = FrameDataset::new(
            (0..20)
                .map(|i| Frame::new(i as f64 * 0.01 + (i % 3) as f64 * 0.002, "A", 8))
                .collect(),
        );
        let stats = calculate_interval_statistics(&dataset).unwrap();
        assert!(stats.min <= stats.mean + 1e-6);
        assert!(stats.mean <= stats.max + 1e-6);
    }
}
