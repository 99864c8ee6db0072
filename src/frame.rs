//! Frame and dataset value types shared by all analytics components.
//!
//! A `FrameDataset` is an immutable snapshot: every component borrows the
//! same dataset and produces fresh derived values, never aliasing mutable
//! state back into it.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// One parsed CAN bus message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Capture time in seconds. Monotonic-intended but not guaranteed sorted.
    pub timestamp: f64,
    /// Bus address/ID token as it appeared in the log (e.g. "0x123").
    pub identifier: String,
    /// Declared payload byte count (DLC). Nominally 0-8; larger values are
    /// kept and flagged by the quality evaluator, not rejected.
    pub length: u32,
    /// Raw payload bytes, not interpreted by the engine.
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(timestamp: f64, identifier: impl Into<String>, length: u32) -> Self {
        Self {
            timestamp,
            identifier: identifier.into(),
            length,
            payload: Vec::new(),
        }
    }

    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }
}

/// Ordered, immutable collection of frames in log order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameDataset {
    frames: Vec<Frame>,
}

impl FrameDataset {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Timestamps sorted ascending, ties keeping original log order.
    ///
    /// Input order is not assumed sorted; a stable sort makes the
    /// consecutive-delta sequence well defined for the interval analyzer
    /// and gap diagnostics.
    pub fn sorted_timestamps(&self) -> Vec<f64> {
        let mut ts: Vec<f64> = self.frames.iter().map(|f| f.timestamp).collect();
        ts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        ts
    }

    /// Consecutive timestamp deltas after sorting. Non-finite deltas are
    /// kept as-is; callers needing causal ordering must pre-validate.
    pub fn sorted_deltas(&self) -> Vec<f64> {
        self.sorted_timestamps()
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect()
    }

    /// Frames carrying the given identifier, original order preserved.
    ///
    /// Pure selection; an identifier absent from the dataset yields an
    /// empty result.
    pub fn filter_by_identifier(&self, identifier: &str) -> FrameDataset {
        let frames = self
            .frames
            .iter()
            .filter(|f| f.identifier == identifier)
            .cloned()
            .collect();
        FrameDataset::new(frames)
    }

    /// Frames with `start <= timestamp <= end`, original order preserved.
    ///
    /// Pure and idempotent: re-filtering a filtered dataset with the same
    /// (or a superset) range returns an identical sequence.
    pub fn filter_by_time_range(&self, start: f64, end: f64) -> Result<FrameDataset> {
        if !(start <= end) {
            return Err(AnalysisError::InvalidRange { start, end });
        }
        let frames = self
            .frames
            .iter()
            .filter(|f| f.timestamp >= start && f.timestamp <= end)
            .cloned()
            .collect();
        Ok(FrameDataset::new(frames))
    }
}

impl FromIterator<Frame> for FrameDataset {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        FrameDataset::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FrameDataset {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
