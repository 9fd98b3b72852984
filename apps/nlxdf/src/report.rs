//! # Report Rendering
//!
//! Human-readable and JSON views of resolved stream tables and loaded
//! sessions, as printed by the CLI.

use nlxdf_core::{
    CanonicalId, IdPlacement, LoadedSession, NlxdfError, RawStreamId, StreamTable, TimeSeries,
};
use serde::Serialize;
use std::fmt::Write as _;

/// Pretty-printed JSON for `--json-mode` output.
pub fn to_pretty_json(value: &impl Serialize) -> Result<String, NlxdfError> {
    serde_json::to_string_pretty(value).map_err(|e| NlxdfError::Serialization(e.to_string()))
}

// =============================================================================
// STREAM TABLE
// =============================================================================

/// JSON view of a resolved stream table.
pub fn stream_table_json(table: &StreamTable) -> Result<serde_json::Value, NlxdfError> {
    serde_json::to_value(table).map_err(|e| NlxdfError::Serialization(e.to_string()))
}

/// Text view of a resolved stream table, one stream per line.
#[must_use]
pub fn render_stream_table(table: &StreamTable) -> String {
    let mut out = String::new();
    let header = match table.placement() {
        IdPlacement::Index => "CANONICAL ID         RAW TYPE        NAME                HOST",
        IdPlacement::Column => " RAW CANONICAL ID        TYPE        NAME                HOST",
    };
    let _ = writeln!(out, "{header}");

    for row in table.rows() {
        let stream = &row.stream;
        let host = stream.hostname.as_deref().unwrap_or("-");
        let _ = match table.placement() {
            IdPlacement::Index => writeln!(
                out,
                "{:<19} {:>4} {:<11} {:<19} {}",
                row.canonical_id.as_str(), stream.raw_id.0, stream.stream_type, stream.name, host
            ),
            IdPlacement::Column => writeln!(
                out,
                "{:>4} {:<19} {:<11} {:<19} {}",
                stream.raw_id.0, row.canonical_id.as_str(), stream.stream_type, stream.name, host
            ),
        };
    }
    let _ = write!(out, "{} streams", table.len());
    out
}

// =============================================================================
// SESSION SUMMARY
// =============================================================================

/// Per-stream digest of a loaded session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamSummary {
    pub canonical_id: CanonicalId,
    pub raw_id: RawStreamId,
    #[serde(rename = "type")]
    pub stream_type: String,
    pub name: String,
    pub channels: usize,
    pub samples: usize,
    pub first_timestamp: Option<f64>,
    pub last_timestamp: Option<f64>,
    pub clock_offsets: usize,
    pub text: bool,
}

/// Digest of a loaded session, in canonical id order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub streams: Vec<StreamSummary>,
}

impl SessionSummary {
    /// Summarize every loaded stream.
    #[must_use]
    pub fn from_session(session: &LoadedSession) -> Self {
        let streams = session
            .metadata()
            .rows()
            .iter()
            .map(|row| {
                let id = &row.canonical_id;
                let footer = session.footer().get(id);
                let series = session.time_series().get(id);
                StreamSummary {
                    canonical_id: id.clone(),
                    raw_id: row.stream.raw_id,
                    stream_type: row.stream.stream_type.clone(),
                    name: row.stream.name.clone(),
                    channels: session.channel_metadata().get(id).map_or(0, Vec::len),
                    samples: series.map_or(0, TimeSeries::len),
                    first_timestamp: footer.and_then(|f| f.first_timestamp),
                    last_timestamp: footer.and_then(|f| f.last_timestamp),
                    clock_offsets: session.clock_offsets().get(id).map_or(0, Vec::len),
                    text: matches!(series, Some(TimeSeries::Text(_))),
                }
            })
            .collect();
        Self { streams }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, NlxdfError> {
        serde_json::to_value(self).map_err(|e| NlxdfError::Serialization(e.to_string()))
    }

    /// Text view, one stream per line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "CANONICAL ID         RAW  CHANNELS  SAMPLES  OFFSETS  FIRST          LAST"
        );
        for s in &self.streams {
            let _ = writeln!(
                out,
                "{:<19} {:>4} {:>9} {:>8} {:>8}  {:<14} {}",
                s.canonical_id.as_str(),
                s.raw_id.0,
                s.channels,
                s.samples,
                s.clock_offsets,
                format_timestamp(s.first_timestamp),
                format_timestamp(s.last_timestamp),
            );
        }
        let _ = write!(out, "{} streams loaded", self.streams.len());
        out
    }
}

fn format_timestamp(ts: Option<f64>) -> String {
    ts.map_or_else(|| "-".to_string(), |t| format!("{t:.3}"))
}
