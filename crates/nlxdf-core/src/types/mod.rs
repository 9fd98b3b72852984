//! # Core Type Definitions
//!
//! This module contains all core types for the nlxdf stream-identity engine:
//! - Stream identifiers (`RawStreamId`, `CanonicalId`)
//! - Stream metadata (`Stream`, `ChannelDescriptor`)
//! - Loader payloads (`FooterRow`, `ClockOffset`, `TimeSeries`, `IndexedTable`, `SessionData`)
//! - Error types (`NlxdfError`)
//!
//! ## Determinism Guarantees
//!
//! All identifier types implement `Ord` so that every stream-indexed
//! collection can live in a `BTreeMap` and iterate in a fixed order.
//! Payload types carry recorded samples verbatim; no arithmetic is done on them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// STREAM IDENTIFIERS
// =============================================================================

/// Container-assigned stream ordinal.
///
/// Unique within one session, unstable across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawStreamId(pub u32);

impl fmt::Display for RawStreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable, human-meaningful stream identifier assigned once per resolved session.
///
/// Ordering is lexicographic on the underlying string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalId(pub String);

impl CanonicalId {
    /// Create a canonical id from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanonicalId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// STREAM METADATA
// =============================================================================

/// One channel of a stream, as described in the stream header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub unit: String,
    #[serde(rename = "type", default)]
    pub channel_type: String,
    /// Channel position published by devices that omit `label`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

impl ChannelDescriptor {
    /// Create a channel descriptor.
    #[must_use]
    pub fn new(label: impl Into<String>, unit: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            unit: unit.into(),
            channel_type: kind.into(),
            index: None,
        }
    }

    /// Create a descriptor that only carries a positional index.
    #[must_use]
    pub fn indexed(index: impl Into<String>, unit: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            label: String::new(),
            unit: unit.into(),
            channel_type: kind.into(),
            index: Some(index.into()),
        }
    }
}

/// One recorded channel group within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    #[serde(alias = "stream_id")]
    pub raw_id: RawStreamId,
    #[serde(rename = "type")]
    pub stream_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default)]
    pub channels: Vec<ChannelDescriptor>,
}

impl Stream {
    /// Create a stream with no hostname, source id or channels.
    #[must_use]
    pub fn new(raw_id: u32, stream_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            raw_id: RawStreamId(raw_id),
            stream_type: stream_type.into(),
            name: name.into(),
            hostname: None,
            source_id: None,
            channels: Vec::new(),
        }
    }

    /// Set the originating hostname.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Set the device/sensor source id.
    #[must_use]
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Set the channel descriptors.
    #[must_use]
    pub fn with_channels(mut self, channels: Vec<ChannelDescriptor>) -> Self {
        self.channels = channels;
        self
    }
}

// =============================================================================
// LOADER PAYLOADS
// =============================================================================

/// Per-stream footer summary written by the recorder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FooterRow {
    #[serde(default)]
    pub first_timestamp: Option<f64>,
    #[serde(default)]
    pub last_timestamp: Option<f64>,
    #[serde(default)]
    pub sample_count: u64,
}

/// One clock-offset measurement between a device and the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockOffset {
    pub time: f64,
    pub value: f64,
}

/// Decoded samples of one stream, one inner vector per sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeSeries {
    Numeric(Vec<Vec<f64>>),
    Text(Vec<Vec<String>>),
}

impl TimeSeries {
    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(rows) => rows.len(),
            Self::Text(rows) => rows.len(),
        }
    }

    /// Check if the stream recorded no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TimeSeries {
    fn default() -> Self {
        Self::Numeric(Vec::new())
    }
}

/// Rows indexed by a stream key, in row order.
///
/// Unlike a map, the index is not required to be unique and row order is
/// whatever the producer chose until the table is remapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedTable<K, R> {
    rows: Vec<(K, R)>,
}

impl<K, R> IndexedTable<K, R> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Create a table from `(index, row)` pairs, preserving their order.
    #[must_use]
    pub fn from_rows(rows: Vec<(K, R)>) -> Self {
        Self { rows }
    }

    /// Append a row.
    pub fn push(&mut self, key: K, row: R) {
        self.rows.push((key, row));
    }

    /// Get all rows in table order.
    #[must_use]
    pub fn rows(&self) -> &[(K, R)] {
        &self.rows
    }

    /// Consume the table, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<(K, R)> {
        self.rows
    }

    /// Iterate over the index column.
    pub fn index(&self) -> impl Iterator<Item = &K> {
        self.rows.iter().map(|(k, _)| k)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<K: PartialEq, R> IndexedTable<K, R> {
    /// Get the first row with the given index.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&R> {
        self.rows.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }
}

impl<K, R> Default for IndexedTable<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Every stream-indexed collection produced by one load, keyed by `K`.
///
/// The loader produces `SessionData<RawStreamId>`; the session facade turns
/// it into `SessionData<CanonicalId>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData<K: Ord> {
    pub loaded_stream_ids: Vec<K>,
    pub channel_metadata: BTreeMap<K, Vec<ChannelDescriptor>>,
    pub footer: IndexedTable<K, FooterRow>,
    pub clock_offsets: BTreeMap<K, Vec<ClockOffset>>,
    pub time_series: BTreeMap<K, TimeSeries>,
    pub time_stamps: BTreeMap<K, Vec<f64>>,
}

impl<K: Ord> Default for SessionData<K> {
    fn default() -> Self {
        Self {
            loaded_stream_ids: Vec::new(),
            channel_metadata: BTreeMap::new(),
            footer: IndexedTable::new(),
            clock_offsets: BTreeMap::new(),
            time_series: BTreeMap::new(),
            time_stamps: BTreeMap::new(),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in nlxdf.
///
/// Three groups matter to callers:
/// - recoverable load conditions (`is_recoverable`), absorbed by the session facade
/// - consistency violations (`is_consistency`), which always propagate
/// - configuration, I/O and (de)serialization failures
#[derive(Debug, Error)]
pub enum NlxdfError {
    /// No stream in the container matched the selection.
    #[error("No loadable streams matched the selection")]
    NoLoadableStreams,

    /// The container has already been loaded by this handle.
    #[error("Session is already loaded")]
    AlreadyLoaded,

    /// The container loader was spent by a load that failed to resolve.
    #[error("Container was consumed by an earlier failed load")]
    LoaderConsumed,

    /// A collection refers to a stream that is not in the resolved table.
    #[error("Stream {0} is not in the resolved metadata table")]
    UnknownStream(RawStreamId),

    /// Two streams resolved to the same canonical id.
    #[error("Duplicate canonical id: {0}")]
    DuplicateCanonicalId(CanonicalId),

    /// Two stream records share a container id.
    #[error("Duplicate stream id: {0}")]
    DuplicateStreamId(RawStreamId),

    /// A caller asked for a canonical id that the session does not have.
    #[error("Unknown canonical id: {0}")]
    UnknownCanonicalId(CanonicalId),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

impl NlxdfError {
    /// Load conditions that leave the session untouched and are not failures.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoLoadableStreams | Self::AlreadyLoaded)
    }

    /// Violations of the resolved-table invariants.
    #[must_use]
    pub fn is_consistency(&self) -> bool {
        matches!(
            self,
            Self::UnknownStream(_) | Self::DuplicateCanonicalId(_) | Self::DuplicateStreamId(_)
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
