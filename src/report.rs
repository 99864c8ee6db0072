//! Analysis report assembly.
//!
//! Runs every analytics component independently over the shared dataset
//! snapshot and bundles the outputs into one serializable record for
//! downstream report writers. A structural failure in one component (empty
//! or too-small dataset) is logged and leaves the other sections intact.

use crate::anomaly::{detect_anomalies, AnomalyConfig, AnomalyLabel, LabeledFrame};
use crate::diagnostics::{generate_diagnostics, DiagnosticsConfig, DiagnosticsOutcome};
use crate::frame::FrameDataset;
use crate::quality::{evaluate_quality, QualityConfig, QualityEvaluation};
use crate::stats::{
    calculate_interval_statistics, calculate_statistics, message_frequency, FrequencyTable,
    IntervalStats, Statistics,
};
use serde::{Deserialize, Serialize};

/// Full configuration surface of the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub quality: QualityConfig,
    pub diagnostics: DiagnosticsConfig,
    pub anomaly: AnomalyConfig,
}

/// All engine outputs as plain structured records; rendering lives with the
/// consumers (text below, JSON via serde).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub statistics: Option<Statistics>,
    pub interval_statistics: Option<IntervalStats>,
    pub frequency_table: FrequencyTable,
    pub quality: QualityEvaluation,
    pub diagnostics: DiagnosticsOutcome,
    pub labeled_frames: Vec<LabeledFrame>,
}

impl AnalysisReport {
    /// Run all components against the dataset.
    pub fn build(dataset: &FrameDataset, config: &EngineConfig) -> Self {
        let statistics = match calculate_statistics(dataset) {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!("statistics unavailable: {e}");
                None
            }
        };

        let interval_statistics = match calculate_interval_statistics(dataset) {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!("interval statistics unavailable: {e}");
                None
            }
        };

        AnalysisReport {
            statistics,
            interval_statistics,
            frequency_table: message_frequency(dataset),
            quality: evaluate_quality(dataset, &config.quality),
            diagnostics: generate_diagnostics(dataset, &config.diagnostics),
            labeled_frames: detect_anomalies(dataset, &config.anomaly),
        }
    }

    pub fn anomalous_frames(&self) -> impl Iterator<Item = &LabeledFrame> {
        self.labeled_frames
            .iter()
            .filter(|l| l.label == AnomalyLabel::Anomalous)
    }

    /// Render the report as plain text.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("CAN Analysis Report\n");
        out.push_str(&"=".repeat(30));
        out.push('\n');

        match &self.statistics {
            Some(stats) => {
                out.push_str(&format!("Total Messages: {}\n", stats.total_messages));
                out.push_str(&format!(
                    "Unique CAN IDs: {}\n",
                    stats.unique_identifier_count
                ));
                out.push_str(&format!("Average DLC: {:.3}\n", stats.average_length));
            }
            None => out.push_str("Statistics: unavailable (empty dataset)\n"),
        }

        out.push_str("\nMessage Frequency:\n");
        for (identifier, count) in &self.frequency_table {
            out.push_str(&format!("  {identifier}: {count}\n"));
        }

        out.push_str("\nInterval Statistics:\n");
        match &self.interval_statistics {
            Some(iv) => {
                out.push_str(&format!("  Min:    {:.6} s\n", iv.min));
                out.push_str(&format!("  Max:    {:.6} s\n", iv.max));
                out.push_str(&format!("  Mean:   {:.6} s\n", iv.mean));
                out.push_str(&format!("  StdDev: {:.6} s\n", iv.stddev));
            }
            None => out.push_str("  unavailable (need at least 2 frames)\n"),
        }

        out.push_str("\nQuality Evaluation:\n");
        match &self.quality {
            QualityEvaluation::Report(q) => {
                out.push_str(&format!(
                    "  Short intervals: {}\n",
                    q.short_interval_count
                ));
                out.push_str(&format!("  Over-length frames: {}\n", q.over_length_count));
                if q.warnings.is_empty() {
                    out.push_str("  No warnings\n");
                }
                for warning in &q.warnings {
                    out.push_str(&format!("  WARNING: {warning}\n"));
                }
            }
            QualityEvaluation::Unavailable => out.push_str("  unavailable\n"),
        }

        out.push_str("\nDiagnostics:\n");
        match &self.diagnostics {
            DiagnosticsOutcome::Advisories(advisories) if advisories.is_empty() => {
                out.push_str("  No advisories\n");
            }
            DiagnosticsOutcome::Advisories(advisories) => {
                for advisory in advisories {
                    out.push_str(&format!("  - {advisory}\n"));
                }
            }
            DiagnosticsOutcome::Unavailable => out.push_str("  unavailable\n"),
        }

        out.push_str("\nDetected Anomalies:\n");
        let mut any = false;
        for labeled in self.anomalous_frames() {
            any = true;
            out.push_str(&format!(
                "  Timestamp: {:.6}, CAN_ID: {}, DLC: {}, score: {:.3}\n",
                labeled.frame.timestamp,
                labeled.frame.identifier,
                labeled.frame.length,
                labeled.score
            ));
        }
        if !any {
            out.push_str("  None\n");
        }

        out
    }
}
