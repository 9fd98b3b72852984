//! # Identity Mapper
//!
//! Re-keys stream-indexed collections from raw ids to canonical ids.
//!
//! The collection shapes produced by a load form a closed set, each
//! implementing [`Remap`]:
//! - `Vec<RawStreamId>`: ids replaced, then sorted
//! - `BTreeMap<RawStreamId, T>`: keys replaced, payload untouched
//! - `IndexedTable<RawStreamId, R>`: index replaced, rows stably sorted by index
//!
//! A raw id missing from the assignment means the collection was not
//! derived from the same resolved table; it is reported as
//! `NlxdfError::UnknownStream` and never skipped. Remapping never merges
//! or drops entries.

use crate::{CanonicalId, IndexedTable, NlxdfError, RawStreamId};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// ID ASSIGNMENT
// =============================================================================

/// Raw id -> canonical id, as produced by classification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdAssignment(BTreeMap<RawStreamId, CanonicalId>);

impl IdAssignment {
    #[must_use]
    pub fn get(&self, raw_id: RawStreamId) -> Option<&CanonicalId> {
        self.0.get(&raw_id)
    }

    /// Look up a raw id, failing with `UnknownStream` if it was never classified.
    pub fn lookup(&self, raw_id: RawStreamId) -> Result<CanonicalId, NlxdfError> {
        self.0
            .get(&raw_id)
            .cloned()
            .ok_or(NlxdfError::UnknownStream(raw_id))
    }

    /// Iterate over `(raw id, canonical id)` pairs in raw id order.
    pub fn iter(&self) -> impl Iterator<Item = (RawStreamId, &CanonicalId)> {
        self.0.iter().map(|(raw, canonical)| (*raw, canonical))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that no two raw ids share a canonical id.
    pub fn verify_unique(&self) -> Result<(), NlxdfError> {
        let mut seen = BTreeSet::new();
        for canonical in self.0.values() {
            if !seen.insert(canonical) {
                return Err(NlxdfError::DuplicateCanonicalId(canonical.clone()));
            }
        }
        Ok(())
    }
}

impl FromIterator<(RawStreamId, CanonicalId)> for IdAssignment {
    fn from_iter<I: IntoIterator<Item = (RawStreamId, CanonicalId)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// REMAP
// =============================================================================

mod sealed {
    pub trait Sealed {}
}

/// Rename stream keys to canonical ids, then reorder ascending.
///
/// Sealed: implemented only for the collection shapes of a session load.
pub trait Remap: sealed::Sealed {
    type Output;

    fn remap(self, ids: &IdAssignment) -> Result<Self::Output, NlxdfError>;
}

/// Remap any supported collection.
pub fn remap<C: Remap>(collection: C, ids: &IdAssignment) -> Result<C::Output, NlxdfError> {
    collection.remap(ids)
}

impl sealed::Sealed for Vec<RawStreamId> {}

impl Remap for Vec<RawStreamId> {
    type Output = Vec<CanonicalId>;

    fn remap(self, ids: &IdAssignment) -> Result<Self::Output, NlxdfError> {
        let mut out = self
            .into_iter()
            .map(|raw| ids.lookup(raw))
            .collect::<Result<Vec<_>, _>>()?;
        out.sort();
        Ok(out)
    }
}

impl<T> sealed::Sealed for BTreeMap<RawStreamId, T> {}

impl<T> Remap for BTreeMap<RawStreamId, T> {
    type Output = BTreeMap<CanonicalId, T>;

    fn remap(self, ids: &IdAssignment) -> Result<Self::Output, NlxdfError> {
        let mut out = BTreeMap::new();
        for (raw, payload) in self {
            let canonical = ids.lookup(raw)?;
            if out.contains_key(&canonical) {
                return Err(NlxdfError::DuplicateCanonicalId(canonical));
            }
            out.insert(canonical, payload);
        }
        Ok(out)
    }
}

impl<R> sealed::Sealed for IndexedTable<RawStreamId, R> {}

impl<R> Remap for IndexedTable<RawStreamId, R> {
    type Output = IndexedTable<CanonicalId, R>;

    fn remap(self, ids: &IdAssignment) -> Result<Self::Output, NlxdfError> {
        let mut rows = self
            .into_rows()
            .into_iter()
            .map(|(raw, row)| Ok((ids.lookup(raw)?, row)))
            .collect::<Result<Vec<_>, NlxdfError>>()?;
        rows.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(IndexedTable::from_rows(rows))
    }
}

impl<C: Remap> sealed::Sealed for Option<C> {}

/// Absent collections stay absent.
impl<C: Remap> Remap for Option<C> {
    type Output = Option<C::Output>;

    fn remap(self, ids: &IdAssignment) -> Result<Self::Output, NlxdfError> {
        self.map(|c| c.remap(ids)).transpose()
    }
}

// =============================================================================
// TESTS
// =============================================================================
