//! # Fixed Identifiers and Limits
//!
//! Compile-time constants for the nlxdf CORE.
//!
//! The device map, reference hosts and rewrite tables are configuration
//! and live in [`crate::config`]. What remains here is fixed logic: the
//! literal ids and name patterns the classifier keys on, load defaults,
//! and input limits.

/// Base id of the recorder's timestamp marker stream.
pub const TS_MARKER_ID: &str = "ts-marker";

/// Base id of the camera recording-time stream.
pub const TS_VIDEO_ID: &str = "ts-video";

/// Base id of the audio marker stream.
pub const TS_AUDIO_ID: &str = "ts-audio";

/// Base id of a sync test running on a reference host.
pub const TEST_REF_ID: &str = "test-ref";

/// Base id of a sync test running on an unmapped device.
pub const TEST_ID: &str = "test";

/// Base id of the sync test control stream.
pub const TEST_CTRL_ID: &str = "test-ctrl";

/// Stream name emitted by the recorder's timestamp marker outlet.
pub const TIMESTAMP_STREAM_NAME: &str = "TimestampStream";

/// Stream name emitted by the camera recorder.
pub const CAMERA_STREAM_NAME: &str = "CameraRecordingTime";

/// Case-insensitive name prefix of Pupil Labs streams.
pub const PUPIL_NAME_PREFIX: &str = "pupil";

/// Name prefix of sync test streams.
pub const TEST_NAME_PREFIX: &str = "Test";

/// Name prefix of relayed streams.
pub const RELAY_NAME_PREFIX: &str = "_relay_";

// =============================================================================
// LOAD DEFAULTS
// =============================================================================

/// Channel metadata field that carries the channel scale.
pub const DEFAULT_CHANNEL_SCALE_FIELD: &str = "unit";

/// Channel metadata field that carries the channel name.
pub const DEFAULT_CHANNEL_NAME_FIELD: &str = "label";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum size of a session dump accepted by `DumpLoader` (1 GB).
///
/// Checked before parsing to avoid reading arbitrarily large files.
pub const MAX_DUMP_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Maximum size of a configuration file (1 MB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_share_prefix() {
        assert!(TEST_REF_ID.starts_with(TEST_ID));
        assert!(TEST_CTRL_ID.starts_with(TEST_ID));
    }

    #[test]
    fn pupil_prefix_is_lowercase() {
        assert_eq!(PUPIL_NAME_PREFIX, PUPIL_NAME_PREFIX.to_lowercase());
    }
}
