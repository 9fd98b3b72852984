//! # Session Dump Format
//!
//! A JSON document holding a session's stream headers together with their
//! already-decoded payloads, and a [`ContainerLoader`] that serves it.
//!
//! Real containers are parsed by an external reader; a dump is what such a
//! reader produces, written out so sessions can be resolved without it.
//! Clock synchronization and dejittering are assumed to have been applied
//! (or not) when the dump was written, so load options are recorded but
//! have no effect here.
//!
//! ```json
//! {
//!   "streams": [
//!     {
//!       "raw_id": 1, "type": "EEG", "name": "eegoSports", "hostname": "DESKTOP-3R7C1PH",
//!       "channels": [{"index": "0", "unit": "microvolts", "type": "ref"}],
//!       "footer": {"first_timestamp": 10.0, "last_timestamp": 12.0, "sample_count": 2},
//!       "clock_offsets": [{"time": 10.0, "value": -0.001}],
//!       "time_series": [[1.5], [1.6]],
//!       "time_stamps": [10.0, 12.0]
//!     }
//!   ]
//! }
//! ```
//!
//! Input size is checked before reading (`MAX_DUMP_FILE_SIZE`).

use crate::loader::{ContainerLoader, LoadOptions, LoadedStreams, StreamSelection};
use crate::primitives::MAX_DUMP_FILE_SIZE;
use crate::{ClockOffset, FooterRow, NlxdfError, SessionData, Stream, TimeSeries};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One stream of a dump: header plus payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpStream {
    #[serde(flatten)]
    pub stream: Stream,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<FooterRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clock_offsets: Vec<ClockOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_series: Option<TimeSeries>,
    #[serde(default)]
    pub time_stamps: Vec<f64>,
}

impl DumpStream {
    /// A stream with no payloads.
    #[must_use]
    pub fn header_only(stream: Stream) -> Self {
        Self {
            stream,
            footer: None,
            clock_offsets: Vec::new(),
            time_series: None,
            time_stamps: Vec::new(),
        }
    }
}

/// A whole session dump.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionDump {
    pub streams: Vec<DumpStream>,
}

impl SessionDump {
    /// Parse a dump from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, NlxdfError> {
        serde_json::from_str(json).map_err(|e| NlxdfError::Serialization(e.to_string()))
    }

    /// Read and parse a dump file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, NlxdfError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| {
            NlxdfError::Io(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_DUMP_FILE_SIZE {
            return Err(NlxdfError::Serialization(format!(
                "Dump size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_DUMP_FILE_SIZE
            )));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| NlxdfError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Serialize the dump as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, NlxdfError> {
        serde_json::to_string_pretty(self).map_err(|e| NlxdfError::Serialization(e.to_string()))
    }
}

/// Serves a `SessionDump` through the `ContainerLoader` interface.
///
/// Loads at most once: a second `load` reports `AlreadyLoaded`.
#[derive(Debug, Clone)]
pub struct DumpLoader {
    dump: SessionDump,
    loaded: bool,
}

impl DumpLoader {
    #[must_use]
    pub fn new(dump: SessionDump) -> Self {
        Self {
            dump,
            loaded: false,
        }
    }

    /// Open a dump file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, NlxdfError> {
        SessionDump::from_path(path).map(Self::new)
    }

    #[must_use]
    pub fn dump(&self) -> &SessionDump {
        &self.dump
    }
}

impl ContainerLoader for DumpLoader {
    fn resolve_streams(&self) -> Result<Vec<Stream>, NlxdfError> {
        Ok(self.dump.streams.iter().map(|d| d.stream.clone()).collect())
    }

    fn load(
        &mut self,
        selection: &StreamSelection,
        options: &LoadOptions,
    ) -> Result<LoadedStreams, NlxdfError> {
        if self.loaded {
            return Err(NlxdfError::AlreadyLoaded);
        }
        tracing::debug!(
            synchronize_clocks = options.synchronize_clocks,
            dejitter_timestamps = options.dejitter_timestamps,
            handle_clock_resets = options.handle_clock_resets,
            "dump payloads are served as recorded"
        );

        let selected: Vec<&DumpStream> = self
            .dump
            .streams
            .iter()
            .filter(|d| selection.matches(&d.stream))
            .collect();
        if selected.is_empty() {
            return Err(NlxdfError::NoLoadableStreams);
        }

        let mut streams = Vec::with_capacity(selected.len());
        let mut data = SessionData::default();
        for entry in selected {
            let raw_id = entry.stream.raw_id;
            data.loaded_stream_ids.push(raw_id);
            if !entry.stream.channels.is_empty() {
                data.channel_metadata
                    .insert(raw_id, entry.stream.channels.clone());
            }
            if let Some(footer) = &entry.footer {
                data.footer.push(raw_id, footer.clone());
            }
            if !entry.clock_offsets.is_empty() {
                data.clock_offsets.insert(raw_id, entry.clock_offsets.clone());
            }
            if let Some(series) = &entry.time_series {
                data.time_series.insert(raw_id, series.clone());
            }
            data.time_stamps.insert(raw_id, entry.time_stamps.clone());
            streams.push(entry.stream.clone());
        }

        self.loaded = true;
        Ok(LoadedStreams { streams, data })
    }
}

// =============================================================================
// TESTS
// =============================================================================
