//! Canalyzer - CAN bus log analytics and anomaly detection
//!
//! This library ingests time-ordered CAN frame logs and produces frequency
//! distributions, inter-message timing statistics, heuristic quality
//! findings, rule-based diagnostics, and per-frame isolation-forest anomaly
//! labels.

pub mod anomaly;
pub mod cli;
pub mod diagnostics;
pub mod error;
pub mod frame;
pub mod isolation_forest;
pub mod parser;
pub mod quality;
pub mod report;
pub mod stats;
