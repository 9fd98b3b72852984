//! Integration tests for resolver configuration loading.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use nlxdf::config::{DEFAULT_CONFIG, default_config, load_config, parse_config};
use nlxdf_core::{IdentityClassifier, MetadataNormalizer, NlxdfError, Stream};
use std::io::Write;

// =============================================================================
// EMBEDDED DEFAULTS
// =============================================================================

#[test]
fn test_embedded_config_parses_and_validates() {
    let config = default_config().unwrap();
    assert_eq!(config.devices.len(), 28);
    assert!(config.is_reference_host("neurolive"));
    assert!(config.is_reference_host("bobby"));
}

#[test]
fn test_embedded_device_lookups() {
    let config = load_config(None).unwrap();
    assert_eq!(config.devices.get("DESKTOP-3R7C1PH"), Some("eeg-a"));
    assert_eq!(config.devices.get("TABLET-47TCFCEB"), Some("eeg-cs-v"));
    assert_eq!(
        config.devices.get("cgs-macl-39034.campus.goldsmiths.ac.uk"),
        Some("mirko")
    );
    assert_eq!(config.devices.get("unknown-host"), None);
}

#[test]
fn test_embedded_channel_rewrites() {
    let config = default_config().unwrap();
    let channel = &config.rewrites.channel;
    assert_eq!(channel.rewrite("label", "0"), "Fp1");
    assert_eq!(channel.rewrite("label", "67"), "CPz");
    assert_eq!(channel.rewrite("label", "33"), "trigger");
    assert_eq!(channel.rewrite("type", "trg"), "stim");
    assert_eq!(channel.rewrite("type", "trigger"), "misc");
    assert_eq!(channel.rewrite("type", "eeg"), "eeg");
}

#[test]
fn test_embedded_config_resolves_neurolive_streams() {
    let config = default_config().unwrap();
    let streams = [
        Stream::new(1, "EEG", "eegoSports").with_hostname("DESKTOP-URRV98M"),
        Stream::new(2, "data", "TestSync").with_hostname("bobby"),
        Stream::new(3, "data", "TestSync").with_hostname("TABLET-9I44R1AR"),
    ];
    let table = MetadataNormalizer::new(&config.rewrites)
        .normalize(&streams)
        .unwrap();
    let ids = IdentityClassifier::new(&config).classify(&table);
    let ids: Vec<_> = ids.iter().map(|(_, c)| c.to_string()).collect();
    assert_eq!(ids, vec!["eeg-d", "test-ref", "test-eeg-f"]);
}

// =============================================================================
// PARSING AND VALIDATION
// =============================================================================

#[test]
fn test_empty_config_is_valid() {
    let config = parse_config("").unwrap();
    assert!(config.devices.is_empty());
    assert!(config.reference_hosts.is_empty());
}

#[test]
fn test_invalid_toml_is_config_error() {
    let err = parse_config("[devices\n").unwrap_err();
    assert!(matches!(err, NlxdfError::Config(_)));
}

#[test]
fn test_unknown_section_is_rejected() {
    let err = parse_config("[plots]\nwidth = 3\n").unwrap_err();
    assert!(matches!(err, NlxdfError::Config(_)));
}

#[test]
fn test_chained_rewrite_is_rejected() {
    let text = r#"
[rewrites.channel.type]
"trg" = "trigger"
"trigger" = "misc"
"#;
    let err = parse_config(text).unwrap_err();
    assert!(matches!(err, NlxdfError::Config(_)));
}

#[test]
fn test_uppercase_type_replacement_is_rejected() {
    let text = r#"
[rewrites.metadata.type]
"eeg" = "EEG"
"#;
    let err = parse_config(text).unwrap_err();
    assert!(matches!(err, NlxdfError::Config(_)));
}

#[test]
fn test_embedded_text_is_exposed() {
    assert!(DEFAULT_CONFIG.contains("[devices]"));
}

// =============================================================================
// ON-DISK CONFIGURATION
// =============================================================================

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "reference_hosts = [\"lab-pc\"]\n\n[devices]\n\"AMP-1\" = \"eeg-x\""
    )
    .unwrap();

    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.devices.get("AMP-1"), Some("eeg-x"));
    assert!(config.is_reference_host("lab-pc"));
    assert!(!config.is_reference_host("neurolive"));
}

#[test]
fn test_missing_config_file_is_io_error() {
    let err = load_config(Some(std::path::Path::new("/nonexistent/nlxdf.toml"))).unwrap_err();
    assert!(matches!(err, NlxdfError::Io(_)));
}
