//! CAN log ingestion.
//!
//! Reads the CSV layout produced by common logging tools:
//! `Timestamp,CAN_ID,DLC,Data` with the data column as space-separated hex
//! bytes. Frames that violate the ingestion contract (finite timestamp,
//! non-empty identifier, integer DLC) are rejected here with the offending
//! line number; the analytics engine never sees them. Over-length DLC values
//! are accepted and left for the quality evaluator to flag.

use crate::error::ParseError;
use crate::frame::{Frame, FrameDataset};
use std::fs;
use std::path::Path;

/// Parse a CAN log file into a dataset, preserving log order.
pub fn parse_can_log(path: &Path) -> Result<FrameDataset, ParseError> {
    let contents = fs::read_to_string(path)?;
    parse_can_log_str(&contents)
}

/// Parse CAN log contents. The first line is treated as a header when it
/// does not start with a number.
pub fn parse_can_log_str(contents: &str) -> Result<FrameDataset, ParseError> {
    let mut frames = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if idx == 0 && !trimmed.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
            continue; // header row
        }
        frames.push(parse_line(trimmed, line_no)?);
    }

    tracing::debug!(frames = frames.len(), "parsed CAN log");
    Ok(FrameDataset::new(frames))
}

fn parse_line(line: &str, line_no: usize) -> Result<Frame, ParseError> {
    let malformed = |reason: &str| ParseError::MalformedFrame {
        line: line_no,
        reason: reason.to_string(),
    };

    let mut fields = line.splitn(4, ',');
    let ts_field = fields.next().unwrap_or("").trim();
    let id_field = fields.next().ok_or_else(|| malformed("missing CAN_ID column"))?.trim();
    let dlc_field = fields.next().ok_or_else(|| malformed("missing DLC column"))?.trim();
    let data_field = fields.next().unwrap_or("").trim();

    let timestamp: f64 = ts_field
        .parse()
        .map_err(|_| malformed("timestamp is not a number"))?;
    if !timestamp.is_finite() {
        return Err(malformed("non-finite timestamp"));
    }

    if id_field.is_empty() {
        return Err(malformed("empty identifier"));
    }

    let length: u32 = dlc_field
        .parse()
        .map_err(|_| malformed("DLC is not a non-negative integer"))?;

    let payload = parse_payload(data_field)
        .map_err(|reason| malformed(&reason))?;

    Ok(Frame::new(timestamp, id_field, length).with_payload(payload))
}

/// Decode a space-separated hex byte column, e.g. "01 02 FF". Each token
/// must be exactly two hex digits; anything else (e.g. "1 2") is malformed
/// rather than silently collapsed into fewer bytes.
fn parse_payload(data_field: &str) -> Result<Vec<u8>, String> {
    data_field
        .split_whitespace()
        .map(|token| {
            if token.len() != 2 {
                return Err(format!("invalid payload hex: byte '{token}' is not two digits"));
            }
            let decoded =
                hex::decode(token).map_err(|e| format!("invalid payload hex: {e}"))?;
            Ok(decoded[0])
        })
        .collect()
}
