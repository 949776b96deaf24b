//! Media metadata extraction.
//!
//! Turns prober output into [`MediaMetadata`]: frame count, rounded frame rate
//! and an escaped start timecode, plus the raw payload for codec policy.

pub mod metadata;
pub mod probe;
pub mod timecode;

// Re-export commonly used types
pub use metadata::{MediaMetadata, RawProbeData, extract_metadata, extract_or_unknown};
pub use probe::{ProbeReport, ProbeTrack, TrackKind, parse_ffprobe, parse_mediainfo, parse_probe_output};
pub use timecode::{escape_timecode, is_drop_frame_rate, normalize_timecode, unescape_timecode};
