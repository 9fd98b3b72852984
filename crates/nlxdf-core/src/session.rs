//! # Session Module
//!
//! The session facade: load through the external container loader, then
//! normalize, classify and re-key everything the load produced.
//!
//! ## Lifecycle
//!
//! A `SessionLoader` starts unloaded. The first successful `load` builds a
//! `LoadedSession` whose metadata table and canonical ids never change
//! afterwards. Loading again, or loading a selection that matches nothing,
//! is logged and leaves the handle as it was.
//!
//! ## Errors
//!
//! Recoverable loader conditions (`NoLoadableStreams`, `AlreadyLoaded`) never
//! escape `load`. Consistency violations and loader failures always do.
//! A loader that reports `AlreadyLoaded` while nothing was resolved has been
//! spent by an aborted load; that surfaces as `LoaderConsumed`.

use crate::config::ResolverConfig;
use crate::loader::{ContainerLoader, LoadOptions, LoadedStreams, StreamSelection};
use crate::mapper::Remap;
use crate::table::{IdPlacement, StreamTable};
use crate::{
    CanonicalId, ChannelDescriptor, ClockOffset, FooterRow, IdentityClassifier, IndexedTable,
    MetadataNormalizer, NlxdfError, SessionData, Stream, TimeSeries,
};
use std::collections::BTreeMap;

// =============================================================================
// LOADED SESSION
// =============================================================================

/// A loaded session with every collection keyed by canonical id.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSession {
    metadata: StreamTable,
    data: SessionData<CanonicalId>,
    selection: StreamSelection,
    options: LoadOptions,
}

impl LoadedSession {
    /// Resolved metadata of the loaded streams, indexed by canonical id.
    #[must_use]
    pub fn metadata(&self) -> &StreamTable {
        &self.metadata
    }

    #[must_use]
    pub fn loaded_stream_ids(&self) -> &[CanonicalId] {
        &self.data.loaded_stream_ids
    }

    #[must_use]
    pub fn channel_metadata(&self) -> &BTreeMap<CanonicalId, Vec<ChannelDescriptor>> {
        &self.data.channel_metadata
    }

    #[must_use]
    pub fn footer(&self) -> &IndexedTable<CanonicalId, FooterRow> {
        &self.data.footer
    }

    #[must_use]
    pub fn clock_offsets(&self) -> &BTreeMap<CanonicalId, Vec<ClockOffset>> {
        &self.data.clock_offsets
    }

    #[must_use]
    pub fn time_series(&self) -> &BTreeMap<CanonicalId, TimeSeries> {
        &self.data.time_series
    }

    #[must_use]
    pub fn time_stamps(&self) -> &BTreeMap<CanonicalId, Vec<f64>> {
        &self.data.time_stamps
    }

    /// All collections at once.
    #[must_use]
    pub fn data(&self) -> &SessionData<CanonicalId> {
        &self.data
    }

    /// Selection the session was loaded with.
    #[must_use]
    pub fn selection(&self) -> &StreamSelection {
        &self.selection
    }

    /// Options the session was loaded with.
    #[must_use]
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Time series of `ids` (every loaded stream if empty), minus `exclude`.
    ///
    /// Returns `UnknownCanonicalId` for a requested id that was not loaded.
    /// Unknown ids in `exclude` are ignored.
    pub fn select(
        &self,
        ids: &[CanonicalId],
        exclude: &[CanonicalId],
    ) -> Result<BTreeMap<&CanonicalId, &TimeSeries>, NlxdfError> {
        let series = &self.data.time_series;
        let mut out = BTreeMap::new();
        if ids.is_empty() {
            out.extend(series.iter());
        } else {
            for id in ids {
                let (key, value) = series
                    .get_key_value(id)
                    .ok_or_else(|| NlxdfError::UnknownCanonicalId(id.clone()))?;
                out.insert(key, value);
            }
        }
        out.retain(|id, _| !exclude.contains(*id));
        Ok(out)
    }
}

// =============================================================================
// SESSION LOADER
// =============================================================================

/// Facade over a container loader that exposes canonical ids only.
#[derive(Debug)]
pub struct SessionLoader<L> {
    loader: L,
    config: ResolverConfig,
    session: Option<LoadedSession>,
}

impl<L: ContainerLoader> SessionLoader<L> {
    /// Create an unloaded session over `loader`.
    ///
    /// Fails with `Config` if the rewrite tables would make normalization
    /// non-idempotent.
    pub fn new(loader: L, config: ResolverConfig) -> Result<Self, NlxdfError> {
        config.validate()?;
        Ok(Self {
            loader,
            config,
            session: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    #[must_use]
    pub fn loader(&self) -> &L {
        &self.loader
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    /// The loaded session, if `load` has succeeded.
    #[must_use]
    pub fn session(&self) -> Option<&LoadedSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn into_session(self) -> Option<LoadedSession> {
        self.session
    }

    /// Describe every stream in the container with its canonical id.
    ///
    /// Does not load samples and does not change the handle.
    pub fn resolve_streams(&self, placement: IdPlacement) -> Result<StreamTable, NlxdfError> {
        let streams = self.loader.resolve_streams()?;
        self.resolve(&streams, placement)
    }

    /// Load the selected streams and re-key every collection to canonical ids.
    ///
    /// Options are forwarded to the container loader unchanged.
    pub fn load(
        &mut self,
        selection: &StreamSelection,
        options: &LoadOptions,
    ) -> Result<&mut Self, NlxdfError> {
        let result = if self.session.is_some() {
            Err(NlxdfError::AlreadyLoaded)
        } else {
            tracing::debug!(?selection, ?options, "loading session container");
            self.loader.load(selection, options)
        };

        let loaded = match result {
            Ok(loaded) => loaded,
            // Loader spent, nothing resolved: a previous load aborted.
            Err(NlxdfError::AlreadyLoaded) if self.session.is_none() => {
                return Err(NlxdfError::LoaderConsumed);
            }
            Err(e) if e.is_recoverable() => {
                tracing::info!("{}", e);
                return Ok(self);
            }
            Err(e) => return Err(e),
        };

        let session = self.resolve_loaded(loaded, selection, options)?;
        tracing::info!(streams = session.metadata.len(), "session loaded");
        self.session = Some(session);
        Ok(self)
    }

    fn resolve(&self, streams: &[Stream], placement: IdPlacement) -> Result<StreamTable, NlxdfError> {
        let table = MetadataNormalizer::new(&self.config.rewrites).normalize(streams)?;
        let ids = IdentityClassifier::new(&self.config).classify(&table);
        StreamTable::build(table, &ids, placement)
    }

    fn resolve_loaded(
        &self,
        loaded: LoadedStreams,
        selection: &StreamSelection,
        options: &LoadOptions,
    ) -> Result<LoadedSession, NlxdfError> {
        let metadata = self.resolve(&loaded.streams, IdPlacement::Index)?;
        let ids = metadata.assignment();
        let normalizer = MetadataNormalizer::new(&self.config.rewrites);

        let raw = loaded.data;
        let data = SessionData {
            loaded_stream_ids: raw.loaded_stream_ids.remap(&ids)?,
            channel_metadata: normalizer
                .normalize_channels(&raw.channel_metadata)
                .remap(&ids)?,
            footer: raw.footer.remap(&ids)?,
            clock_offsets: raw.clock_offsets.remap(&ids)?,
            time_series: raw.time_series.remap(&ids)?,
            time_stamps: raw.time_stamps.remap(&ids)?,
        };

        Ok(LoadedSession {
            metadata,
            data,
            selection: selection.clone(),
            options: options.clone(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
