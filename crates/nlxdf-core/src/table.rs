//! # Stream Table
//!
//! The resolved metadata table: every stream with its canonical id.
//!
//! The canonical id is either the table key (`IdPlacement::Index`, rows
//! sorted by canonical id) or an ordinary column next to the preserved raw
//! key (`IdPlacement::Column`, rows sorted by raw id). The rows are the
//! same in both cases; only the ordering key differs.

use crate::mapper::IdAssignment;
use crate::normalizer::MetadataTable;
use crate::{CanonicalId, NlxdfError, RawStreamId, Stream};
use serde::{Deserialize, Serialize};

/// Where the canonical id lives in a resolved table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPlacement {
    /// Canonical id is the key; rows ordered by canonical id.
    #[default]
    Index,
    /// Canonical id is a column; raw id stays the key.
    Column,
}

/// One resolved stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamRow {
    pub canonical_id: CanonicalId,
    #[serde(flatten)]
    pub stream: Stream,
}

/// Streams of one session with their canonical ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamTable {
    placement: IdPlacement,
    rows: Vec<StreamRow>,
}

impl StreamTable {
    /// Join a metadata table with its id assignment.
    ///
    /// # Errors
    /// - `DuplicateCanonicalId` if two streams share a canonical id
    /// - `UnknownStream` if a stream has no assigned id
    pub fn build(
        table: MetadataTable,
        ids: &IdAssignment,
        placement: IdPlacement,
    ) -> Result<Self, NlxdfError> {
        ids.verify_unique()?;

        let mut rows = table
            .into_streams()
            .into_iter()
            .map(|stream| {
                Ok(StreamRow {
                    canonical_id: ids.lookup(stream.raw_id)?,
                    stream,
                })
            })
            .collect::<Result<Vec<_>, NlxdfError>>()?;

        match placement {
            IdPlacement::Index => rows.sort_by(|a, b| a.canonical_id.cmp(&b.canonical_id)),
            IdPlacement::Column => rows.sort_by_key(|row| row.stream.raw_id),
        }

        Ok(Self { placement, rows })
    }

    #[must_use]
    pub fn placement(&self) -> IdPlacement {
        self.placement
    }

    /// Rows in key order.
    #[must_use]
    pub fn rows(&self) -> &[StreamRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a stream by canonical id.
    #[must_use]
    pub fn get(&self, id: &CanonicalId) -> Option<&Stream> {
        self.rows
            .iter()
            .find(|row| &row.canonical_id == id)
            .map(|row| &row.stream)
    }

    /// Find a row by raw id.
    #[must_use]
    pub fn get_raw(&self, raw_id: RawStreamId) -> Option<&StreamRow> {
        self.rows.iter().find(|row| row.stream.raw_id == raw_id)
    }

    /// Canonical ids in row order.
    pub fn canonical_ids(&self) -> impl Iterator<Item = &CanonicalId> {
        self.rows.iter().map(|row| &row.canonical_id)
    }

    /// The raw id -> canonical id lookup this table was built from.
    #[must_use]
    pub fn assignment(&self) -> IdAssignment {
        self.rows
            .iter()
            .map(|row| (row.stream.raw_id, row.canonical_id.clone()))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
