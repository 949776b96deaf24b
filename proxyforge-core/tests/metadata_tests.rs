// proxyforge-core/tests/metadata_tests.rs

mod common;

use common::{MockProber, mediainfo_json};
use proxyforge_core::error::CoreError;
use proxyforge_core::media::{extract_metadata, extract_or_unknown, unescape_timecode};
use proxyforge_core::MediaMetadata;
use std::path::Path;

#[test]
fn test_extract_metadata_from_mediainfo() {
    let prober = MockProber::new().respond("A001.mov", mediainfo_json(2400, "59.940", "10:00:00;00", 3));

    let metadata = extract_metadata(&prober, Path::new("/footage/day1/A001.mov")).unwrap();

    assert_eq!(metadata.total_frames, Some(2400));
    assert_eq!(metadata.frame_rate, Some(60));
    assert_eq!(metadata.start_timecode.as_deref(), Some(r"10\:00\:00\;00"));
    assert_eq!(metadata.audio_track_count(), 3);
}

#[test]
fn test_prober_exit_failure_is_probe_failure() {
    let prober = MockProber::new().fail("A001.mov", "Unable to open file");

    let err = extract_metadata(&prober, Path::new("/footage/day1/A001.mov")).unwrap_err();
    match err {
        CoreError::ProbeFailure { path, reason } => {
            assert_eq!(path, Path::new("/footage/day1/A001.mov"));
            assert!(reason.contains("Unable to open file"), "{reason}");
        }
        other => panic!("Unexpected error: {other:?}"),
    }
}

#[test]
fn test_malformed_json_degrades_to_unknown() {
    let prober = MockProber::new().respond("A001.mov", "{\"media\": ");

    let metadata = extract_or_unknown(&prober, Path::new("A001.mov"));
    assert_eq!(metadata, MediaMetadata::unknown());
}

#[test]
fn test_timecode_escaping_round_trips_through_unescape() {
    let prober = MockProber::new().respond("A001.mov", mediainfo_json(10, "23.976", "01:02:03;04", 1));

    let metadata = extract_metadata(&prober, Path::new("A001.mov")).unwrap();
    let escaped = metadata.start_timecode.unwrap();
    // 24 fps is not a drop-frame rate, so the separator is forced to ':'.
    assert_eq!(escaped, r"01\:02\:03\:04");
    assert_eq!(unescape_timecode(&escaped), "01:02:03:04");
}
