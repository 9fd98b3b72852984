//! # nlxdf - Canonical Stream Ids
//!
//! The main binary for the nlxdf stream-identity resolver.
//!
//! This application provides:
//! - CLI interface for resolving and loading session dumps
//! - TOML resolver configuration with embedded Neurolive defaults
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              apps/nlxdf (THE BINARY)          │
//! │                                               │
//! │   ┌─────────────┐        ┌────────────────┐   │
//! │   │    CLI      │        │  Config/Report │   │
//! │   │   (clap)    │        │  (toml, json)  │   │
//! │   └──────┬──────┘        └───────┬────────┘   │
//! │          └───────────┬───────────┘            │
//! │                      ▼                        │
//! │              ┌───────────────┐                │
//! │              │  nlxdf-core   │                │
//! │              │  (THE LOGIC)  │                │
//! │              └───────────────┘                │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! nlxdf resolve -f session.json
//! nlxdf load -f session.json --select type:eeg,type:markers
//! nlxdf --config site.toml config
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // NLXDF_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("NLXDF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "nlxdf=debug,nlxdf_core=debug"
    } else {
        "nlxdf=info,nlxdf_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so stdout stays clean for reports.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the nlxdf startup banner.
fn print_banner() {
    eprintln!("nlxdf v{} - canonical stream ids", env!("CARGO_PKG_VERSION"));
}
