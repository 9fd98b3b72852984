//! # nlxdf CLI Module
//!
//! This module implements the CLI interface for nlxdf.
//!
//! ## Available Commands
//!
//! - `resolve` - List a session's streams with their canonical ids
//! - `load` - Load a session dump and summarize it by canonical id
//! - `config` - Print the effective resolver configuration

mod commands;

use clap::{Parser, Subcommand};
use nlxdf_core::primitives::{DEFAULT_CHANNEL_NAME_FIELD, DEFAULT_CHANNEL_SCALE_FIELD};
use nlxdf_core::{CanonicalId, NlxdfError, StreamSelector};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// nlxdf - canonical stream ids for Neurolive sessions
///
/// Gives every stream of a multi-device recording a stable, human-meaningful
/// id derived from its metadata instead of its position in the container.
#[derive(Parser, Debug)]
#[command(name = "nlxdf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Resolver configuration (TOML); defaults to the embedded Neurolive tables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every stream of a session dump with its canonical id
    Resolve {
        /// Path to the session dump (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Keep raw ids as the key and show canonical ids as a column
        #[arg(long)]
        column: bool,
    },

    /// Load a session dump and re-key it by canonical id
    Load {
        /// Path to the session dump (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Streams to load (`id:N`, `name:S`, `type:S`); all if omitted
        #[arg(short, long = "select", value_delimiter = ',')]
        select: Vec<StreamSelector>,

        /// Only report these canonical ids
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Leave these canonical ids out of the report
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Do not synchronize stream clocks
        #[arg(long)]
        no_sync: bool,

        /// Do not dejitter timestamps
        #[arg(long)]
        no_dejitter: bool,

        /// Do not handle clock resets
        #[arg(long)]
        no_clock_resets: bool,

        /// Channel metadata field holding the channel scale
        #[arg(long, default_value = DEFAULT_CHANNEL_SCALE_FIELD)]
        scale_field: String,

        /// Channel metadata field holding the channel name
        #[arg(long, default_value = DEFAULT_CHANNEL_NAME_FIELD)]
        name_field: String,
    },

    /// Print the effective resolver configuration as JSON
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), NlxdfError> {
    let config = nlxdf::config::load_config(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Resolve { file, column } => cmd_resolve(config, json_mode, &file, column),
        Commands::Load {
            file,
            select,
            only,
            exclude,
            no_sync,
            no_dejitter,
            no_clock_resets,
            scale_field,
            name_field,
        } => {
            let options = nlxdf_core::LoadOptions {
                channel_scale_field: scale_field,
                channel_name_field: name_field,
                synchronize_clocks: !no_sync,
                dejitter_timestamps: !no_dejitter,
                handle_clock_resets: !no_clock_resets,
            };
            let only: Vec<CanonicalId> = only.into_iter().map(CanonicalId).collect();
            let exclude: Vec<CanonicalId> = exclude.into_iter().map(CanonicalId).collect();
            cmd_load(
                config,
                json_mode,
                &file,
                select.into_iter().collect(),
                &options,
                &only,
                &exclude,
            )
        }
        Commands::Config => cmd_config(&config),
    }
}
