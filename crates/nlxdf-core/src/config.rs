//! # Resolver Configuration
//!
//! Static lookup tables consumed by normalization and classification.
//!
//! - `DeviceMap`: hostname -> device canonical name
//! - `FieldRewriteRules`: per-field exact-value substitutions
//! - `ResolverConfig`: both of the above plus the reference-host set
//!
//! All of it is plain data. `ResolverConfig::default()` is empty; site
//! defaults are supplied by the caller (the `nlxdf` binary ships its own).
//! Configuration is read-only once constructed and may be shared freely
//! between resolutions.

use crate::NlxdfError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// DEVICE MAP
// =============================================================================

/// Hostname -> device canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceMap(BTreeMap<String, String>);

impl DeviceMap {
    /// Create an empty device map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping, returning the updated map.
    #[must_use]
    pub fn with(mut self, hostname: impl Into<String>, device: impl Into<String>) -> Self {
        self.0.insert(hostname.into(), device.into());
        self
    }

    /// Look up the device name for a hostname.
    #[must_use]
    pub fn get(&self, hostname: &str) -> Option<&str> {
        self.0.get(hostname).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, hostname: &str) -> bool {
        self.0.contains_key(hostname)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(hostname, device)` pairs in hostname order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(h, d)| (h.as_str(), d.as_str()))
    }
}

impl<H: Into<String>, D: Into<String>> FromIterator<(H, D)> for DeviceMap {
    fn from_iter<I: IntoIterator<Item = (H, D)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(h, d)| (h.into(), d.into()))
                .collect(),
        )
    }
}

// =============================================================================
// FIELD REWRITE RULES
// =============================================================================

/// Field name -> (exact value -> replacement).
///
/// Values with no entry pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRewriteRules(BTreeMap<String, BTreeMap<String, String>>);

impl FieldRewriteRules {
    /// Create an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a substitution for `field`, returning the updated rules.
    #[must_use]
    pub fn with(
        mut self,
        field: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.0
            .entry(field.into())
            .or_default()
            .insert(from.into(), to.into());
        self
    }

    /// Rewrite `value` of `field`, or return it unchanged.
    #[must_use]
    pub fn rewrite<'a>(&'a self, field: &str, value: &'a str) -> &'a str {
        self.0
            .get(field)
            .and_then(|table| table.get(value))
            .map_or(value, String::as_str)
    }

    /// Rewrite an owned value in place.
    pub fn apply(&self, field: &str, value: &mut String) {
        if let Some(replacement) = self.0.get(field).and_then(|table| table.get(value.as_str())) {
            value.clone_from(replacement);
        }
    }

    /// Substitution table for one field, if any.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Check that applying the rules twice changes nothing.
    ///
    /// A replacement that is itself a key of the same field table (with a
    /// different target) forms a chain and is rejected.
    pub fn validate(&self, name: &str) -> Result<(), NlxdfError> {
        for (field, table) in &self.0 {
            for (from, to) in table {
                if let Some(next) = table.get(to) {
                    if next != to {
                        return Err(NlxdfError::Config(format!(
                            "{name} rewrite for field '{field}' chains '{from}' -> '{to}' -> '{next}'"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// RESOLVER CONFIG
// =============================================================================

/// Rewrite tables for stream metadata and channel metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteConfig {
    /// Applied to `type`, `name`, `hostname` and `source_id` of each stream.
    #[serde(default)]
    pub metadata: FieldRewriteRules,
    /// Applied to `label`, `unit` and `type` of each channel.
    #[serde(default)]
    pub channel: FieldRewriteRules,
}

/// Everything the resolver needs besides the streams themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    #[serde(default)]
    pub devices: DeviceMap,
    /// Hosts whose sync tests count as ground truth.
    #[serde(default)]
    pub reference_hosts: BTreeSet<String>,
    #[serde(default)]
    pub rewrites: RewriteConfig,
}

impl ResolverConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the device map.
    #[must_use]
    pub fn with_devices(mut self, devices: DeviceMap) -> Self {
        self.devices = devices;
        self
    }

    /// Add a reference host.
    #[must_use]
    pub fn with_reference_host(mut self, host: impl Into<String>) -> Self {
        self.reference_hosts.insert(host.into());
        self
    }

    /// Replace the stream metadata rewrite rules.
    #[must_use]
    pub fn with_metadata_rewrites(mut self, rules: FieldRewriteRules) -> Self {
        self.rewrites.metadata = rules;
        self
    }

    /// Replace the channel metadata rewrite rules.
    #[must_use]
    pub fn with_channel_rewrites(mut self, rules: FieldRewriteRules) -> Self {
        self.rewrites.channel = rules;
        self
    }

    #[must_use]
    pub fn is_reference_host(&self, host: &str) -> bool {
        self.reference_hosts.contains(host)
    }

    /// Reject configurations under which normalization is not idempotent.
    ///
    /// Stream types are lowercased before rewriting, so `type` replacements
    /// must be lowercase as well.
    pub fn validate(&self) -> Result<(), NlxdfError> {
        self.rewrites.metadata.validate("metadata")?;
        self.rewrites.channel.validate("channel")?;

        if let Some(types) = self.rewrites.metadata.field("type") {
            if let Some(bad) = types.values().find(|to| to.to_lowercase() != **to) {
                return Err(NlxdfError::Config(format!(
                    "metadata rewrite for field 'type' produces non-lowercase value '{bad}'"
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
