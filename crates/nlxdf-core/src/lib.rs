//! # nlxdf-core
//!
//! The deterministic stream-identity engine for nlxdf - THE LOGIC.
//!
//! A recording session holds dozens of time-synchronized streams (EEG
//! amplifiers, marker outlets, gaze trackers, sync tests) whose only native
//! identifier is a container-assigned ordinal. This crate gives every stream
//! a stable, human-meaningful canonical id and re-keys every stream-indexed
//! collection of the session to it.
//!
//! ## Pipeline
//!
//! ```text
//! ContainerLoader ──► MetadataNormalizer ──► IdentityClassifier ──► IdentityMapper
//!   (external)          (case, rewrites)      (rules, collisions)    (Remap impls)
//!                              └──────────── SessionLoader ────────────┘
//! ```
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies, no interior mutability
//! - BTreeMap ordering everywhere; canonical ids sort lexicographically
//! - Device map and rewrite tables are injected configuration, never literals
//! - Container parsing, clock sync and plotting stay outside this crate

// =============================================================================
// MODULES
// =============================================================================

pub mod classifier;
pub mod config;
pub mod formats;
pub mod loader;
pub mod mapper;
pub mod normalizer;
pub mod primitives;
pub mod session;
pub mod table;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CanonicalId, ChannelDescriptor, ClockOffset, FooterRow, IndexedTable, NlxdfError,
    RawStreamId, SessionData, Stream, TimeSeries,
};

// =============================================================================
// RE-EXPORTS: Resolution Pipeline
// =============================================================================

pub use classifier::{BaseId, IdentityClassifier, Rule, default_rules};
pub use config::{DeviceMap, FieldRewriteRules, ResolverConfig, RewriteConfig};
pub use loader::{ContainerLoader, LoadOptions, LoadedStreams, StreamSelection, StreamSelector};
pub use mapper::{IdAssignment, Remap, remap};
pub use normalizer::{MetadataNormalizer, MetadataTable};
pub use session::{LoadedSession, SessionLoader};
pub use table::{IdPlacement, StreamRow, StreamTable};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{DumpLoader, DumpStream, SessionDump};
