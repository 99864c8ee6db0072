//! Per-frame anomaly detection.
//!
//! Wraps the isolation forest: fit once on the whole dataset's
//! (timestamp, length) feature pairs, score every frame, then label the top
//! `round(contamination * n)` scores as anomalous. The quantile cut keeps
//! the anomalous fraction stable across datasets of different scale, unlike
//! a fixed score threshold. Single frames are classified against the same
//! fitted forest, never by retraining.

use crate::frame::{Frame, FrameDataset};
use crate::isolation_forest::{FeaturePoint, IsolationForest};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Tunable forest parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Number of trees in the ensemble.
    pub num_trees: usize,
    /// Sub-sample size per tree (psi), clamped to the dataset size.
    pub sub_sample_size: usize,
    /// Expected fraction of the dataset treated as anomalous.
    pub contamination: f64,
    /// Seed for reproducible forests. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            num_trees: 100,
            sub_sample_size: 256,
            contamination: 0.05,
            seed: None,
        }
    }
}

/// Per-frame label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyLabel {
    Normal,
    Anomalous,
}

/// A frame copied out with its score and label; the source dataset is never
/// mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledFrame {
    pub frame: Frame,
    pub score: f64,
    pub label: AnomalyLabel,
}

/// Isolation-forest detector. Fit on a representative batch, then usable for
/// both whole-dataset labeling and single-frame classification.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
    forest: Option<IsolationForest>,
    degenerate: bool,
}

fn features(frame: &Frame) -> FeaturePoint {
    [frame.timestamp, frame.length as f64]
}

impl AnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Self {
        Self {
            config,
            forest: None,
            degenerate: false,
        }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Train the forest on the dataset's feature pairs.
    ///
    /// Datasets with fewer than two frames or with all-identical feature
    /// pairs are degenerate: there is nothing to isolate, so labeling will
    /// mark every frame normal.
    pub fn fit(&mut self, dataset: &FrameDataset) {
        let points: Vec<FeaturePoint> = dataset.iter().map(features).collect();

        self.degenerate = points.len() < 2 || points.windows(2).all(|w| w[0] == w[1]);
        if self.degenerate {
            tracing::debug!(
                frames = points.len(),
                "anomaly detector degenerate: labeling everything normal"
            );
            self.forest = None;
            return;
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.forest = Some(IsolationForest::fit(
            &points,
            self.config.num_trees,
            self.config.sub_sample_size,
            &mut rng,
        ));
    }

    /// Score a single frame against the fitted forest. `None` until `fit`
    /// has been called on a non-degenerate dataset.
    pub fn score_frame(&self, frame: &Frame) -> Option<f64> {
        self.forest
            .as_ref()
            .map(|forest| forest.anomaly_score(&features(frame)))
    }

    /// Score and label every frame.
    ///
    /// Output order matches the dataset; exactly `round(contamination * n)`
    /// frames get the anomalous label (the highest-scoring ones).
    pub fn label_frames(&self, dataset: &FrameDataset) -> Vec<LabeledFrame> {
        let n = dataset.len();

        let forest = match (&self.forest, self.degenerate) {
            (Some(forest), false) => forest,
            _ => {
                return dataset
                    .iter()
                    .map(|frame| LabeledFrame {
                        frame: frame.clone(),
                        score: 0.0,
                        label: AnomalyLabel::Normal,
                    })
                    .collect();
            }
        };

        let scores: Vec<f64> = dataset
            .iter()
            .map(|frame| forest.anomaly_score(&features(frame)))
            .collect();

        // Quantile cut: rank indices by descending score, flag the top
        // round(c * n).
        let anomaly_count = ((self.config.contamination * n as f64).round() as usize).min(n);
        let mut ranked: Vec<usize> = (0..n).collect();
        ranked.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut labels = vec![AnomalyLabel::Normal; n];
        for &idx in ranked.iter().take(anomaly_count) {
            labels[idx] = AnomalyLabel::Anomalous;
        }

        dataset
            .iter()
            .zip(scores)
            .zip(labels)
            .map(|((frame, score), label)| LabeledFrame {
                frame: frame.clone(),
                score,
                label,
            })
            .collect()
    }
}

/// One-shot convenience: fit on the dataset and label it.
pub fn detect_anomalies(dataset: &FrameDataset, config: &AnomalyConfig) -> Vec<LabeledFrame> {
    let mut detector = AnomalyDetector::new(config.clone());
    detector.fit(dataset);
    detector.label_frames(dataset)
}
