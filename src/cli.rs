//! CLI argument parsing for canalyzer.

use crate::anomaly::AnomalyConfig;
use crate::diagnostics::DiagnosticsConfig;
use crate::quality::QualityConfig;
use crate::report::EngineConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text report (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "canalyzer")]
#[command(version)]
#[command(about = "CAN bus log analytics with isolation-forest anomaly detection", long_about = None)]
pub struct Cli {
    /// Path to the CAN log file (CSV: Timestamp,CAN_ID,DLC,Data)
    pub log_file: PathBuf,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only analyze frames with timestamp >= this value (seconds)
    #[arg(long = "start", value_name = "SECONDS")]
    pub start: Option<f64>,

    /// Only analyze frames with timestamp <= this value (seconds)
    #[arg(long = "end", value_name = "SECONDS")]
    pub end: Option<f64>,

    /// Only analyze frames with this CAN identifier (e.g. 0x123)
    #[arg(long = "can-id", value_name = "ID")]
    pub can_id: Option<String>,

    /// Expected anomaly fraction for the isolation forest
    #[arg(long = "contamination", value_name = "FRACTION", default_value = "0.05")]
    pub contamination: f64,

    /// Number of trees in the isolation forest
    #[arg(long = "trees", value_name = "COUNT", default_value = "100")]
    pub num_trees: usize,

    /// Sub-sample size per tree (clamped to the dataset size)
    #[arg(long = "sub-sample", value_name = "SIZE", default_value = "256")]
    pub sub_sample_size: usize,

    /// Random seed for reproducible anomaly detection
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Intervals below this (seconds) count as "short" in the quality report
    #[arg(
        long = "short-interval-threshold",
        value_name = "SECONDS",
        default_value = "0.01"
    )]
    pub short_interval_threshold: f64,

    /// Frames with DLC above this count as over-length
    #[arg(long = "max-length", value_name = "BYTES", default_value = "8")]
    pub max_length: u32,

    /// Identifier occurrence count above which a diagnostic is emitted
    #[arg(long = "frequency-threshold", value_name = "COUNT", default_value = "3")]
    pub frequency_threshold: u64,

    /// Consecutive gap above this (seconds) triggers a diagnostic
    #[arg(long = "gap-threshold", value_name = "SECONDS", default_value = "0.2")]
    pub gap_threshold: f64,
}

impl Cli {
    /// Collect the configuration surface into an engine config.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            quality: QualityConfig {
                short_interval_threshold: self.short_interval_threshold,
                max_length: self.max_length,
            },
            diagnostics: DiagnosticsConfig {
                frequency_threshold: self.frequency_threshold,
                gap_threshold: self.gap_threshold,
            },
            anomaly: AnomalyConfig {
                num_trees: self.num_trees,
                sub_sample_size: self.sub_sample_size,
                contamination: self.contamination,
                seed: self.seed,
            },
        }
    }
}
