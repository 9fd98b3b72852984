//! # Resolution Scenarios (S1-S6)
//!
//! End-to-end checks of stream-id resolution on small, hand-built sessions.
//!
//! ## Tiers
//! - S1: EEG device mapping
//! - S2: Marker streams
//! - S3: Pupil Labs collisions
//! - S4: Repeated loads
//! - S5: Relayed streams
//! - S6: Full load from a session dump

use nlxdf_core::{
    CanonicalId, DeviceMap, DumpLoader, FieldRewriteRules, IdPlacement, IdentityClassifier,
    LoadOptions, MetadataNormalizer, NlxdfError, RawStreamId, ResolverConfig, SessionDump,
    SessionLoader, Stream, StreamSelection, StreamSelector,
};

fn config() -> ResolverConfig {
    ResolverConfig::new()
        .with_devices(
            DeviceMap::new()
                .with("DESKTOP-3R7C1PH", "eeg-a")
                .with("DESKTOP-2TI6RBU", "eeg-b"),
        )
        .with_reference_host("neurolive")
        .with_reference_host("bobby")
        .with_channel_rewrites(
            FieldRewriteRules::new()
                .with("label", "0", "Fp1")
                .with("label", "1", "Fpz")
                .with("type", "ref", "eeg")
                .with("type", "trg", "stim"),
        )
}

fn resolve(streams: &[Stream]) -> Vec<(u32, String)> {
    let config = config();
    let table = MetadataNormalizer::new(&config.rewrites)
        .normalize(streams)
        .expect("normalize");
    IdentityClassifier::new(&config)
        .classify(&table)
        .iter()
        .map(|(raw, canonical)| (raw.0, canonical.to_string()))
        .collect()
}

// =============================================================================
// TIER S1: EEG DEVICE MAPPING
// =============================================================================

mod s1_eeg_devices {
    use super::*;

    /// S1.1: A mapped host names the device; an unmapped host falls back to the raw id.
    #[test]
    fn mapped_and_unmapped_hosts() {
        let ids = resolve(&[
            Stream::new(1, "EEG", "eegoSports").with_hostname("DESKTOP-3R7C1PH"),
            Stream::new(2, "EEG", "eegoSports").with_hostname("unknown-host"),
        ]);
        assert_eq!(ids, vec![(1, "eeg-a".to_string()), (2, "2".to_string())]);
    }

    /// S1.2: Two streams from the same amplifier host are disambiguated.
    #[test]
    fn same_host_twice() {
        let ids = resolve(&[
            Stream::new(4, "eeg", "eegoSports").with_hostname("DESKTOP-2TI6RBU"),
            Stream::new(3, "eeg", "eegoSports").with_hostname("DESKTOP-2TI6RBU"),
        ]);
        assert_eq!(ids, vec![(3, "eeg-b".to_string()), (4, "eeg-b-2".to_string())]);
    }

    /// S1.3: Sync tests running on tablets are named after the tablet.
    #[test]
    fn sync_tests_follow_device_names() {
        let ids = resolve(&[
            Stream::new(1, "data", "Test").with_hostname("bobby"),
            Stream::new(2, "data", "Test").with_hostname("DESKTOP-3R7C1PH"),
            Stream::new(3, "data", "Test").with_hostname("laptop"),
            Stream::new(4, "control", "TestControl"),
        ]);
        assert_eq!(
            ids,
            vec![
                (1, "test-ref".to_string()),
                (2, "test-eeg-a".to_string()),
                (3, "test".to_string()),
                (4, "test-ctrl".to_string()),
            ]
        );
    }
}

// =============================================================================
// TIER S2: MARKER STREAMS
// =============================================================================

mod s2_markers {
    use super::*;

    /// S2.1: Distinct raw ids never collide.
    #[test]
    fn markers_keep_their_raw_ids() {
        let ids = resolve(&[
            Stream::new(7, "Markers", "events"),
            Stream::new(12, "Markers", "events"),
            Stream::new(20, "Markers", "events"),
        ]);
        assert_eq!(
            ids,
            vec![
                (7, "7-markers".to_string()),
                (12, "12-markers".to_string()),
                (20, "20-markers".to_string()),
            ]
        );
    }

    /// S2.2: Timestamp outlets have fixed names.
    #[test]
    fn timestamp_outlets() {
        let ids = resolve(&[
            Stream::new(1, "marker", "TimestampStream"),
            Stream::new(2, "marker", "CameraRecordingTime"),
            Stream::new(3, "marker", "audio"),
        ]);
        assert_eq!(
            ids,
            vec![
                (1, "ts-marker".to_string()),
                (2, "ts-video".to_string()),
                (3, "ts-audio".to_string()),
            ]
        );
    }
}

// =============================================================================
// TIER S3: PUPIL LABS COLLISIONS
// =============================================================================

mod s3_pupil {
    use super::*;

    /// S3.1: Two gaze streams of one device: first keeps the bare id.
    #[test]
    fn gaze_collision() {
        let ids = resolve(&[
            Stream::new(9, "gaze", "pupil_capture").with_source_id("123"),
            Stream::new(5, "gaze", "pupil_capture").with_source_id("123"),
        ]);
        assert_eq!(
            ids,
            vec![(5, "pl-123-gaze".to_string()), (9, "pl-123-gaze-2".to_string())]
        );
    }

    /// S3.2: Event and gaze streams of one device do not collide.
    #[test]
    fn event_and_gaze() {
        let ids = resolve(&[
            Stream::new(5, "event", "pupil_capture").with_source_id("123"),
            Stream::new(9, "event", "pupil_capture").with_source_id("123"),
            Stream::new(10, "gaze", "Pupil Capture").with_source_id("123"),
        ]);
        assert_eq!(
            ids,
            vec![
                (5, "pl-123-event".to_string()),
                (9, "pl-123-event-2".to_string()),
                (10, "pl-123-gaze".to_string()),
            ]
        );
    }
}

// =============================================================================
// TIER S4: REPEATED LOADS
// =============================================================================

mod s4_repeated_loads {
    use super::*;

    fn loader() -> DumpLoader {
        let dump = SessionDump::from_json_str(
            r#"{"streams": [
                {"raw_id": 1, "type": "Markers", "name": "events", "time_stamps": [0.0]}
            ]}"#,
        )
        .expect("dump");
        DumpLoader::new(dump)
    }

    /// S4.1: Loading a loaded session returns the unchanged handle without error.
    #[test]
    fn second_load_is_silent_no_op() {
        let mut session = SessionLoader::new(loader(), config()).expect("valid config");
        session
            .load(&StreamSelection::all(), &LoadOptions::default())
            .expect("first load");
        let before = session.session().cloned();

        let result = session.load(&StreamSelection::all(), &LoadOptions::default());
        assert!(result.is_ok());
        assert_eq!(session.session().cloned(), before);
    }

    /// S4.2: A selection that matches nothing leaves the handle unloaded.
    #[test]
    fn unmatched_selection_is_silent_no_op() {
        let mut session = SessionLoader::new(loader(), config()).expect("valid config");
        let selection = StreamSelection::new(vec![StreamSelector::Name("nope".into())]);
        assert!(session.load(&selection, &LoadOptions::default()).is_ok());
        assert!(!session.is_loaded());

        // The handle can still be loaded afterwards.
        session
            .load(&StreamSelection::all(), &LoadOptions::default())
            .expect("load");
        assert!(session.is_loaded());
    }
}

// =============================================================================
// TIER S5: RELAYED STREAMS
// =============================================================================

mod s5_relay {
    use super::*;

    /// S5.1: Relayed streams keep their raw id with a relay suffix.
    #[test]
    fn relay_suffix() {
        let ids = resolve(&[Stream::new(14, "audio", "_relay_mic")]);
        assert_eq!(ids, vec![(14, "14-relay".to_string())]);
    }
}

// =============================================================================
// TIER S6: FULL LOAD FROM A SESSION DUMP
// =============================================================================

mod s6_full_load {
    use super::*;

    const DUMP: &str = r#"{"streams": [
        {
            "raw_id": 3, "type": "EEG", "name": "eegoSports", "hostname": "DESKTOP-3R7C1PH",
            "channels": [
                {"index": "0", "unit": "uV", "type": "ref"},
                {"index": "1", "unit": "uV", "type": "ref"},
                {"label": "33", "unit": "", "type": "trg"}
            ],
            "footer": {"first_timestamp": 100.0, "last_timestamp": 100.004, "sample_count": 3},
            "clock_offsets": [{"time": 100.0, "value": -0.0021}],
            "time_series": [[1.0, 2.0, 0.0], [1.1, 2.1, 0.0], [1.2, 2.2, 1.0]],
            "time_stamps": [100.0, 100.002, 100.004]
        },
        {
            "raw_id": 1, "type": "Markers", "name": "TimestampStream", "hostname": "neurolive",
            "footer": {"first_timestamp": 100.0, "last_timestamp": 101.0, "sample_count": 2},
            "time_series": [["1"], ["2"]],
            "time_stamps": [100.0, 101.0]
        },
        {
            "raw_id": 2, "type": "gaze", "name": "pupil_capture", "source_id": "123",
            "footer": {"first_timestamp": 100.0, "last_timestamp": 100.0, "sample_count": 1},
            "time_series": [[0.5, 0.5]],
            "time_stamps": [100.0]
        }
    ]}"#;

    fn loaded() -> SessionLoader<DumpLoader> {
        let loader = DumpLoader::new(SessionDump::from_json_str(DUMP).expect("dump"));
        let mut session = SessionLoader::new(loader, config()).expect("valid config");
        session
            .load(&StreamSelection::all(), &LoadOptions::default())
            .expect("load");
        session
    }

    /// S6.1: Every collection shares one sorted canonical id space.
    #[test]
    fn all_collections_share_canonical_ids() {
        let session = loaded();
        let loaded = session.session().expect("loaded");
        let expected = vec![
            CanonicalId::from("eeg-a"),
            CanonicalId::from("pl-123-gaze"),
            CanonicalId::from("ts-marker"),
        ];

        assert_eq!(loaded.loaded_stream_ids(), expected.as_slice());
        assert_eq!(loaded.metadata().canonical_ids().cloned().collect::<Vec<_>>(), expected);
        assert_eq!(loaded.footer().index().cloned().collect::<Vec<_>>(), expected);
        assert_eq!(loaded.time_series().keys().cloned().collect::<Vec<_>>(), expected);
        assert_eq!(loaded.time_stamps().keys().cloned().collect::<Vec<_>>(), expected);
        assert_eq!(
            loaded.clock_offsets().keys().cloned().collect::<Vec<_>>(),
            vec![CanonicalId::from("eeg-a")]
        );
        assert_eq!(
            loaded.channel_metadata().keys().cloned().collect::<Vec<_>>(),
            vec![CanonicalId::from("eeg-a")]
        );
    }

    /// S6.2: Channel metadata is normalized on the way in.
    #[test]
    fn channel_metadata_is_normalized() {
        let session = loaded();
        let loaded = session.session().expect("loaded");
        let channels = &loaded.channel_metadata()[&CanonicalId::from("eeg-a")];
        let labels: Vec<_> = channels.iter().map(|c| c.label.as_str()).collect();
        let types: Vec<_> = channels.iter().map(|c| c.channel_type.as_str()).collect();
        assert_eq!(labels, vec!["Fp1", "Fpz", "33"]);
        assert_eq!(types, vec!["eeg", "eeg", "stim"]);
    }

    /// S6.3: Payloads follow their stream through the re-keying.
    #[test]
    fn payloads_follow_streams() {
        let session = loaded();
        let loaded = session.session().expect("loaded");
        let eeg = CanonicalId::from("eeg-a");
        assert_eq!(loaded.time_series()[&eeg].len(), 3);
        assert_eq!(loaded.footer().get(&eeg).map(|f| f.sample_count), Some(3));
        assert_eq!(
            loaded.metadata().get(&eeg).map(|s| s.raw_id),
            Some(RawStreamId(3))
        );
        assert_eq!(
            loaded.metadata().get(&CanonicalId::from("ts-marker")).map(|s| s.stream_type.as_str()),
            Some("markers")
        );
    }

    /// S6.4: resolve_streams without loading offers both id placements.
    #[test]
    fn resolve_without_loading() {
        let loader = DumpLoader::new(SessionDump::from_json_str(DUMP).expect("dump"));
        let session = SessionLoader::new(loader, config()).expect("valid config");
        let column = session.resolve_streams(IdPlacement::Column).expect("resolve");
        let raw: Vec<_> = column.rows().iter().map(|r| r.stream.raw_id.0).collect();
        assert_eq!(raw, vec![1, 2, 3]);
        assert_eq!(column.rows()[0].canonical_id.as_str(), "ts-marker");
        assert!(!session.is_loaded());
    }

    /// S6.5: A partial selection classifies only the selected streams.
    #[test]
    fn partial_selection() {
        let loader = DumpLoader::new(SessionDump::from_json_str(DUMP).expect("dump"));
        let mut session = SessionLoader::new(loader, config()).expect("valid config");
        let selection = StreamSelection::new(vec![StreamSelector::Type("eeg".into())]);
        session.load(&selection, &LoadOptions::default()).expect("load");
        let loaded = session.session().expect("loaded");
        assert_eq!(loaded.loaded_stream_ids(), &[CanonicalId::from("eeg-a")]);
        assert_eq!(loaded.selection(), &selection);
    }

    /// S6.6: Duplicate raw ids in the container abort the load.
    #[test]
    fn duplicate_raw_ids_abort() {
        let dump = SessionDump::from_json_str(
            r#"{"streams": [
                {"raw_id": 1, "type": "eeg", "name": "a"},
                {"raw_id": 1, "type": "eeg", "name": "b"}
            ]}"#,
        )
        .expect("dump");
        let mut session =
            SessionLoader::new(DumpLoader::new(dump), config()).expect("valid config");
        let err = session
            .load(&StreamSelection::all(), &LoadOptions::default())
            .map(|_| ())
            .expect_err("duplicate");
        assert!(matches!(err, NlxdfError::DuplicateStreamId(RawStreamId(1))));
        assert!(err.is_consistency());
    }
}
