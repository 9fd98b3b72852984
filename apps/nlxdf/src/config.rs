//! # Configuration Loading
//!
//! Resolver configuration is TOML. Without `--config` the binary uses the
//! Neurolive tables embedded at build time (`config/neurolive.toml`).
//!
//! ```toml
//! reference_hosts = ["neurolive"]
//!
//! [devices]
//! "DESKTOP-3R7C1PH" = "eeg-a"
//!
//! [rewrites.channel.label]
//! "0" = "Fp1"
//! ```
//!
//! Every loaded configuration is validated before use.

use nlxdf_core::NlxdfError;
use nlxdf_core::ResolverConfig;
use nlxdf_core::primitives::MAX_CONFIG_FILE_SIZE;
use std::path::Path;

/// The embedded Neurolive site configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../config/neurolive.toml");

/// Parse and validate a configuration from TOML text.
pub fn parse_config(text: &str) -> Result<ResolverConfig, NlxdfError> {
    let config: ResolverConfig =
        toml::from_str(text).map_err(|e| NlxdfError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// The embedded default configuration.
pub fn default_config() -> Result<ResolverConfig, NlxdfError> {
    parse_config(DEFAULT_CONFIG)
}

/// Load the configuration at `path`, or the embedded default if `None`.
pub fn load_config(path: Option<&Path>) -> Result<ResolverConfig, NlxdfError> {
    let Some(path) = path else {
        return default_config();
    };

    let metadata = std::fs::metadata(path).map_err(|e| {
        NlxdfError::Io(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(NlxdfError::Config(format!(
            "Config size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_CONFIG_FILE_SIZE
        )));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| NlxdfError::Io(format!("Cannot read config '{}': {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "loading resolver configuration");
    parse_config(&text)
}
