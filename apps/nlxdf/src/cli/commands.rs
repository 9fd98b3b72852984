//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use nlxdf::report::{SessionSummary, render_stream_table, stream_table_json, to_pretty_json};
use nlxdf_core::{
    CanonicalId, DumpLoader, IdPlacement, LoadOptions, NlxdfError, ResolverConfig, SessionLoader,
    StreamSelection,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Validate an input file path.
///
/// Resolves `..` and symlinks and rejects anything that is not a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, NlxdfError> {
    let canonical = path.canonicalize().map_err(|e| {
        NlxdfError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(NlxdfError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

fn open_session(config: ResolverConfig, file: &Path) -> Result<SessionLoader<DumpLoader>, NlxdfError> {
    let validated_path = validate_file_path(file)?;
    tracing::info!("Reading session dump {:?}", validated_path);
    let loader = DumpLoader::open(&validated_path)?;
    SessionLoader::new(loader, config)
}

fn print_json(value: &impl Serialize) -> Result<(), NlxdfError> {
    println!("{}", to_pretty_json(value)?);
    Ok(())
}

// =============================================================================
// RESOLVE COMMAND
// =============================================================================

/// List every stream of a dump with its canonical id.
pub fn cmd_resolve(
    config: ResolverConfig,
    json_mode: bool,
    file: &Path,
    column: bool,
) -> Result<(), NlxdfError> {
    let session = open_session(config, file)?;
    let placement = if column {
        IdPlacement::Column
    } else {
        IdPlacement::Index
    };
    let table = session.resolve_streams(placement)?;

    if json_mode {
        return print_json(&stream_table_json(&table)?);
    }

    println!("{}", render_stream_table(&table));
    Ok(())
}

// =============================================================================
// LOAD COMMAND
// =============================================================================

/// Load a dump and report the re-keyed session.
///
/// `only` and `exclude` narrow the report to streams with samples.
pub fn cmd_load(
    config: ResolverConfig,
    json_mode: bool,
    file: &Path,
    selection: StreamSelection,
    options: &LoadOptions,
    only: &[CanonicalId],
    exclude: &[CanonicalId],
) -> Result<(), NlxdfError> {
    let mut session = open_session(config, file)?;
    session.load(&selection, options)?;

    let Some(loaded) = session.session() else {
        if json_mode {
            return print_json(&serde_json::json!({ "loaded": false, "streams": [] }));
        }
        println!("No streams loaded");
        return Ok(());
    };

    let mut summary = SessionSummary::from_session(loaded);
    if !only.is_empty() || !exclude.is_empty() {
        let keep: BTreeSet<&CanonicalId> = loaded.select(only, exclude)?.into_keys().collect();
        summary.streams.retain(|s| keep.contains(&s.canonical_id));
    }

    if json_mode {
        let mut output = summary.to_json()?;
        if let Some(obj) = output.as_object_mut() {
            obj.insert("loaded".to_string(), serde_json::Value::Bool(true));
        }
        return print_json(&output);
    }

    println!("{}", summary.render());
    Ok(())
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Print the effective resolver configuration.
pub fn cmd_config(config: &ResolverConfig) -> Result<(), NlxdfError> {
    print_json(config)
}
