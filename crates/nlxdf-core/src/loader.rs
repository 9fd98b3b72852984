//! # Container Loader Boundary
//!
//! The seam between nlxdf and the external session-container reader.
//!
//! Reading and decoding the container, clock synchronization, dejittering
//! and clock-reset handling all happen behind [`ContainerLoader`]. nlxdf
//! hands it a stream selection and the load options untouched, and gets
//! back raw-id keyed stream metadata and payload collections.

use crate::primitives::{DEFAULT_CHANNEL_NAME_FIELD, DEFAULT_CHANNEL_SCALE_FIELD};
use crate::{NlxdfError, RawStreamId, SessionData, Stream};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// STREAM SELECTION
// =============================================================================

/// One stream filter criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamSelector {
    Id(RawStreamId),
    Name(String),
    /// Matched case-insensitively.
    Type(String),
}

impl StreamSelector {
    #[must_use]
    pub fn matches(&self, stream: &Stream) -> bool {
        match self {
            Self::Id(id) => stream.raw_id == *id,
            Self::Name(name) => stream.name == *name,
            Self::Type(kind) => stream.stream_type.eq_ignore_ascii_case(kind),
        }
    }
}

/// Parses `id:N`, `name:S` or `type:S`; a bare integer is an id.
impl FromStr for StreamSelector {
    type Err = NlxdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_id = |v: &str| {
            v.parse::<u32>()
                .map(|n| Self::Id(RawStreamId(n)))
                .map_err(|e| NlxdfError::Config(format!("Invalid stream id '{v}': {e}")))
        };
        match s.split_once(':') {
            Some(("id", v)) => parse_id(v),
            Some(("name", v)) => Ok(Self::Name(v.to_string())),
            Some(("type", v)) => Ok(Self::Type(v.to_string())),
            Some((kind, _)) => Err(NlxdfError::Config(format!(
                "Unknown selector kind '{kind}' (expected id, name or type)"
            ))),
            None => parse_id(s),
        }
    }
}

/// Streams to load. An empty selection loads everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamSelection(Vec<StreamSelector>);

impl StreamSelection {
    /// Select every stream.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(selectors: Vec<StreamSelector>) -> Self {
        Self(selectors)
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn selectors(&self) -> &[StreamSelector] {
        &self.0
    }

    /// A stream is selected if any selector matches it.
    #[must_use]
    pub fn matches(&self, stream: &Stream) -> bool {
        self.is_all() || self.0.iter().any(|s| s.matches(stream))
    }
}

impl FromIterator<StreamSelector> for StreamSelection {
    fn from_iter<I: IntoIterator<Item = StreamSelector>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// LOAD OPTIONS
// =============================================================================

/// Options forwarded verbatim to the container loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Channel metadata field holding the channel scale.
    pub channel_scale_field: String,
    /// Channel metadata field holding the channel name.
    pub channel_name_field: String,
    pub synchronize_clocks: bool,
    pub dejitter_timestamps: bool,
    pub handle_clock_resets: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            channel_scale_field: DEFAULT_CHANNEL_SCALE_FIELD.to_string(),
            channel_name_field: DEFAULT_CHANNEL_NAME_FIELD.to_string(),
            synchronize_clocks: true,
            dejitter_timestamps: true,
            handle_clock_resets: true,
        }
    }
}

// =============================================================================
// CONTAINER LOADER
// =============================================================================

/// Result of one successful container load, keyed by raw id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedStreams {
    /// Metadata of the loaded streams.
    pub streams: Vec<Stream>,
    pub data: SessionData<RawStreamId>,
}

/// External reader of session containers.
///
/// # Errors
/// `load` reports `NoLoadableStreams` when nothing matches the selection
/// and `AlreadyLoaded` when called again after a successful load. Both are
/// treated as no-ops by the session facade; anything else aborts the load.
pub trait ContainerLoader {
    /// Describe every stream in the container without loading samples.
    fn resolve_streams(&self) -> Result<Vec<Stream>, NlxdfError>;

    /// Read and decode the selected streams. Blocks until complete.
    fn load(
        &mut self,
        selection: &StreamSelection,
        options: &LoadOptions,
    ) -> Result<LoadedStreams, NlxdfError>;
}

// =============================================================================
// TESTS
// =============================================================================
