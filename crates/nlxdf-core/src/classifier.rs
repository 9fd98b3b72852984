//! # Identity Classifier
//!
//! Derives a canonical id for every stream of a metadata table.
//!
//! Classification is an ordered list of named rules; the first rule that
//! returns a base id wins, and streams no rule claims fall back to their raw
//! id. Base ids are then made unique with a per-call collision registry:
//! the first stream with a given base id keeps it, later ones get `-2`,
//! `-3`, ... in ascending raw id order.
//!
//! Classification never fails. Lookup misses in the device map degrade to
//! the raw id and are logged as warnings.

use crate::config::ResolverConfig;
use crate::mapper::IdAssignment;
use crate::normalizer::MetadataTable;
use crate::primitives::{
    CAMERA_STREAM_NAME, PUPIL_NAME_PREFIX, RELAY_NAME_PREFIX, TEST_CTRL_ID, TEST_ID,
    TEST_NAME_PREFIX, TEST_REF_ID, TIMESTAMP_STREAM_NAME, TS_AUDIO_ID, TS_MARKER_ID, TS_VIDEO_ID,
};
use crate::{CanonicalId, Stream};
use std::collections::BTreeMap;

/// Rule predicate/action: returns the base id if the rule claims the stream.
pub type RuleFn = fn(&Stream, &ResolverConfig) -> Option<String>;

/// A named classification rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: RuleFn,
}

impl Rule {
    #[must_use]
    pub const fn new(name: &'static str, apply: RuleFn) -> Self {
        Self { name, apply }
    }
}

/// Name reported for streams that no rule claimed.
pub const FALLBACK_RULE: &str = "raw-id";

/// A base id together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseId {
    pub rule: &'static str,
    pub id: String,
}

// =============================================================================
// RULES
// =============================================================================

/// The standard rule list, in priority order.
#[must_use]
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new("eeg-device", eeg_device),
        Rule::new("timestamp-marker", timestamp_marker),
        Rule::new("video-timestamp", video_timestamp),
        Rule::new("audio-marker", audio_marker),
        Rule::new("pupil-labs", pupil_labs),
        Rule::new("sync-test", sync_test),
        Rule::new("sync-control", sync_control),
        Rule::new("markers", markers),
        Rule::new("relay", relay),
    ]
}

/// EEG amplifiers are named after the host they were recorded on.
pub fn eeg_device(stream: &Stream, config: &ResolverConfig) -> Option<String> {
    if !stream.stream_type.eq_ignore_ascii_case("eeg") {
        return None;
    }
    match stream.hostname.as_deref().and_then(|h| config.devices.get(h)) {
        Some(device) => Some(device.to_string()),
        None => {
            tracing::warn!(
                raw_id = %stream.raw_id,
                hostname = stream.hostname.as_deref().unwrap_or("<none>"),
                "eeg stream host is not in the device map, using raw id"
            );
            Some(stream.raw_id.to_string())
        }
    }
}

pub fn timestamp_marker(stream: &Stream, _: &ResolverConfig) -> Option<String> {
    (stream.name == TIMESTAMP_STREAM_NAME).then(|| TS_MARKER_ID.to_string())
}

pub fn video_timestamp(stream: &Stream, _: &ResolverConfig) -> Option<String> {
    (stream.name == CAMERA_STREAM_NAME).then(|| TS_VIDEO_ID.to_string())
}

pub fn audio_marker(stream: &Stream, _: &ResolverConfig) -> Option<String> {
    (stream.stream_type == "marker" && stream.name == "audio").then(|| TS_AUDIO_ID.to_string())
}

/// Pupil Labs event and gaze streams, keyed by device source id.
///
/// Claims every pupil-named stream: other types get the raw id and do not
/// reach later rules.
pub fn pupil_labs(stream: &Stream, _: &ResolverConfig) -> Option<String> {
    if !stream.name.to_lowercase().starts_with(PUPIL_NAME_PREFIX) {
        return None;
    }
    let source = stream.source_id.as_deref().unwrap_or("unknown");
    let kind = &stream.stream_type;
    if kind.eq_ignore_ascii_case("event") {
        Some(format!("pl-{source}-event"))
    } else if kind.eq_ignore_ascii_case("gaze") {
        Some(format!("pl-{source}-gaze"))
    } else {
        Some(stream.raw_id.to_string())
    }
}

/// Clock sync tests, named after where they ran.
pub fn sync_test(stream: &Stream, config: &ResolverConfig) -> Option<String> {
    if stream.stream_type != "data" || !stream.name.starts_with(TEST_NAME_PREFIX) {
        return None;
    }
    let host = stream.hostname.as_deref();
    if host.is_some_and(|h| config.is_reference_host(h)) {
        // Sync test on the recording host is the ground truth.
        return Some(TEST_REF_ID.to_string());
    }
    match host.and_then(|h| config.devices.get(h)) {
        Some(device) => Some(format!("{TEST_ID}-{device}")),
        None => Some(TEST_ID.to_string()),
    }
}

pub fn sync_control(stream: &Stream, _: &ResolverConfig) -> Option<String> {
    (stream.stream_type == "control").then(|| TEST_CTRL_ID.to_string())
}

pub fn markers(stream: &Stream, _: &ResolverConfig) -> Option<String> {
    stream
        .stream_type
        .eq_ignore_ascii_case("markers")
        .then(|| format!("{}-markers", stream.raw_id))
}

pub fn relay(stream: &Stream, _: &ResolverConfig) -> Option<String> {
    stream
        .name
        .starts_with(RELAY_NAME_PREFIX)
        .then(|| format!("{}-relay", stream.raw_id))
}

// =============================================================================
// COLLISION REGISTRY
// =============================================================================

/// Occurrence counts of base ids within one classification pass.
#[derive(Debug, Default)]
struct CollisionRegistry {
    counts: BTreeMap<String, u32>,
}

impl CollisionRegistry {
    /// Count `base` and return its disambiguated form.
    fn register(&mut self, base: String) -> CanonicalId {
        let count = self.counts.entry(base.clone()).or_insert(0);
        *count = count.saturating_add(1);
        if *count == 1 {
            CanonicalId(base)
        } else {
            CanonicalId(format!("{base}-{count}"))
        }
    }
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Rule evaluator mapping stream metadata to canonical ids.
pub struct IdentityClassifier<'a> {
    config: &'a ResolverConfig,
    rules: Vec<Rule>,
}

impl<'a> IdentityClassifier<'a> {
    /// Create a classifier with the standard rule list.
    #[must_use]
    pub fn new(config: &'a ResolverConfig) -> Self {
        Self::with_rules(config, default_rules())
    }

    /// Create a classifier with a custom rule list, evaluated in order.
    #[must_use]
    pub fn with_rules(config: &'a ResolverConfig, rules: Vec<Rule>) -> Self {
        Self { config, rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Compute the pre-collision base id of a single stream.
    #[must_use]
    pub fn base_id(&self, stream: &Stream) -> BaseId {
        self.rules
            .iter()
            .find_map(|rule| {
                (rule.apply)(stream, self.config).map(|id| BaseId {
                    rule: rule.name,
                    id,
                })
            })
            .unwrap_or_else(|| BaseId {
                rule: FALLBACK_RULE,
                id: stream.raw_id.to_string(),
            })
    }

    /// Assign a canonical id to every stream of the table.
    ///
    /// Streams are processed in ascending raw id order, which fixes the
    /// collision suffixes.
    #[must_use]
    pub fn classify(&self, table: &MetadataTable) -> IdAssignment {
        let mut registry = CollisionRegistry::default();
        table
            .iter()
            .map(|stream| {
                let base = self.base_id(stream);
                let canonical = registry.register(base.id);
                tracing::debug!(
                    raw_id = %stream.raw_id,
                    rule = base.rule,
                    canonical_id = %canonical,
                    "classified stream"
                );
                (stream.raw_id, canonical)
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
