//! # Metadata Normalizer
//!
//! Turns raw per-stream records into a uniform metadata table.
//!
//! - Lowercases stream `type`
//! - Applies the configured exact-value rewrites to stream and channel fields
//! - Fills missing channel labels from the channel index
//! - Performs no id classification
//!
//! Inputs are never mutated; every operation returns new values.

use crate::config::RewriteConfig;
use crate::{ChannelDescriptor, NlxdfError, RawStreamId, Stream};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Normalized stream records keyed by raw id, in ascending raw id order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataTable {
    streams: BTreeMap<RawStreamId, Stream>,
}

impl MetadataTable {
    #[must_use]
    pub fn get(&self, raw_id: RawStreamId) -> Option<&Stream> {
        self.streams.get(&raw_id)
    }

    /// Iterate over streams in ascending raw id order.
    pub fn iter(&self) -> impl Iterator<Item = &Stream> {
        self.streams.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Consume the table, returning streams in ascending raw id order.
    #[must_use]
    pub fn into_streams(self) -> Vec<Stream> {
        self.streams.into_values().collect()
    }
}

/// Applies case folding and field rewrites to stream metadata.
pub struct MetadataNormalizer<'a> {
    rules: &'a RewriteConfig,
}

impl<'a> MetadataNormalizer<'a> {
    /// Create a normalizer over the given rewrite tables.
    #[must_use]
    pub fn new(rules: &'a RewriteConfig) -> Self {
        Self { rules }
    }

    /// Normalize raw stream records into a table keyed by raw id.
    ///
    /// Returns `NlxdfError::DuplicateStreamId` if two records share a raw id.
    pub fn normalize(&self, raw: &[Stream]) -> Result<MetadataTable, NlxdfError> {
        let mut streams = BTreeMap::new();
        for record in raw {
            match streams.entry(record.raw_id) {
                Entry::Occupied(_) => return Err(NlxdfError::DuplicateStreamId(record.raw_id)),
                Entry::Vacant(slot) => {
                    slot.insert(self.normalize_stream(record));
                }
            }
        }
        Ok(MetadataTable { streams })
    }

    /// Normalize a single stream record, including its channels.
    #[must_use]
    pub fn normalize_stream(&self, stream: &Stream) -> Stream {
        let metadata = &self.rules.metadata;

        let mut stream_type = stream.stream_type.to_lowercase();
        metadata.apply("type", &mut stream_type);

        let mut name = stream.name.clone();
        metadata.apply("name", &mut name);

        let hostname = stream
            .hostname
            .as_deref()
            .map(|h| metadata.rewrite("hostname", h).to_string());
        let source_id = stream
            .source_id
            .as_deref()
            .map(|s| metadata.rewrite("source_id", s).to_string());

        Stream {
            raw_id: stream.raw_id,
            stream_type,
            name,
            hostname,
            source_id,
            channels: stream.channels.iter().map(|c| self.normalize_channel(c)).collect(),
        }
    }

    /// Normalize one channel descriptor.
    #[must_use]
    pub fn normalize_channel(&self, channel: &ChannelDescriptor) -> ChannelDescriptor {
        let rules = &self.rules.channel;

        let mut label = channel.label.clone();
        if label.is_empty() {
            if let Some(index) = &channel.index {
                label.clone_from(index);
            }
        }
        rules.apply("label", &mut label);

        ChannelDescriptor {
            label,
            unit: rules.rewrite("unit", &channel.unit).to_string(),
            channel_type: rules.rewrite("type", &channel.channel_type).to_string(),
            index: channel.index.clone(),
        }
    }

    /// Normalize a loader's per-stream channel metadata map.
    #[must_use]
    pub fn normalize_channels<K: Ord + Clone>(
        &self,
        channels: &BTreeMap<K, Vec<ChannelDescriptor>>,
    ) -> BTreeMap<K, Vec<ChannelDescriptor>> {
        channels
            .iter()
            .map(|(k, list)| {
                (
                    k.clone(),
                    list.iter().map(|c| self.normalize_channel(c)).collect(),
                )
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
