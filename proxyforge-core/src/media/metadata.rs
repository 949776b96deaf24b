//! Authoritative per-file metadata: frame count, frame rate and start timecode.
//!
//! Resolution rules, applied to the tool-independent [`ProbeReport`]:
//!
//! - frame count: explicit count on the primary video track, else
//!   `round(duration * exact frame rate)` from the video track (or the
//!   container when the video track has no duration), else unknown;
//! - frame rate: the primary video track's rate, else the first track that
//!   reports one; stored rounded to the nearest integer;
//! - timecode: the video track's, else the first other track carrying one,
//!   normalized against the rounded rate. Without a rate there is nothing to
//!   drive a timecode overlay, so the timecode is dropped.

use std::path::Path;

use serde_json::Value;

use super::probe::{ProbeReport, TrackKind, parse_probe_output};
use super::timecode::normalize_timecode;
use crate::error::{CoreResult, probe_failure};
use crate::external::{ProbeExecutor, ProbeTool};

/// Opaque prober payload kept for policy decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProbeData {
    pub tool: ProbeTool,
    pub payload: Value,
}

impl RawProbeData {
    /// Counts audio tracks in the payload using the tool's own vocabulary.
    #[must_use]
    pub fn audio_track_count(&self) -> usize {
        match self.tool {
            ProbeTool::MediaInfo => self
                .payload
                .pointer("/media/track")
                .and_then(Value::as_array)
                .map_or(0, |tracks| {
                    tracks
                        .iter()
                        .filter(|t| t.get("@type").and_then(Value::as_str) == Some("Audio"))
                        .count()
                }),
            ProbeTool::Ffprobe => self
                .payload
                .get("streams")
                .and_then(Value::as_array)
                .map_or(0, |streams| {
                    streams
                        .iter()
                        .filter(|s| s.get("codec_type").and_then(Value::as_str) == Some("audio"))
                        .count()
                }),
        }
    }
}

/// Metadata for one source file. Every field may be unknown.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaMetadata {
    pub total_frames: Option<u64>,
    /// Frame rate rounded to the nearest integer
    pub frame_rate: Option<u32>,
    /// Normalized, backslash-escaped start timecode
    pub start_timecode: Option<String>,
    pub raw_probe_data: Option<RawProbeData>,
}

impl MediaMetadata {
    /// Metadata for a file whose probe failed.
    #[must_use]
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Audio track count, zero when nothing was probed.
    #[must_use]
    pub fn audio_track_count(&self) -> usize {
        self.raw_probe_data
            .as_ref()
            .map_or(0, RawProbeData::audio_track_count)
    }

    /// Applies the resolution rules to a parsed report.
    #[must_use]
    pub fn from_report(report: ProbeReport) -> Self {
        let video = report.primary_video();

        let exact_rate = video
            .and_then(|v| v.frame_rate)
            .or_else(|| report.tracks.iter().find_map(|t| t.frame_rate));
        let frame_rate = exact_rate
            .map(|rate| rate.round() as u32)
            .filter(|rate| *rate > 0);

        let total_frames = video.and_then(|v| v.frame_count).or_else(|| {
            let rate = exact_rate?;
            let duration = video.and_then(|v| v.duration_secs).or_else(|| {
                report
                    .tracks_of(TrackKind::General)
                    .find_map(|t| t.duration_secs)
            })?;
            Some((duration * rate).round() as u64)
        });

        let raw_timecode = video
            .and_then(|v| v.timecode.as_deref())
            .or_else(|| report.tracks.iter().find_map(|t| t.timecode.as_deref()));
        let start_timecode = match (raw_timecode, frame_rate) {
            (Some(raw), Some(rate)) => {
                let normalized = normalize_timecode(raw, rate);
                if normalized.is_none() {
                    log::warn!("Ignoring unparsable timecode '{}' at {} fps", raw, rate);
                }
                normalized
            }
            (Some(raw), None) => {
                log::debug!("Dropping timecode '{}': no frame rate reported", raw);
                None
            }
            (None, _) => None,
        };

        MediaMetadata {
            total_frames,
            frame_rate,
            start_timecode,
            raw_probe_data: Some(RawProbeData {
                tool: report.tool,
                payload: report.raw,
            }),
        }
    }
}

/// Runs the prober on `input_path` and resolves its metadata.
///
/// Any failure (tool missing, non-zero exit, unparsable output) is returned as
/// [`crate::CoreError::ProbeFailure`].
pub fn extract_metadata<P: ProbeExecutor + ?Sized>(prober: &P, input_path: &Path) -> CoreResult<MediaMetadata> {
    let text = prober
        .run(input_path)
        .map_err(|e| probe_failure(input_path, e))?;
    let report =
        parse_probe_output(prober.tool(), &text).map_err(|e| probe_failure(input_path, e))?;
    let metadata = MediaMetadata::from_report(report);
    log::debug!(
        "Metadata for {}: frames={:?} rate={:?} timecode={:?} audio_tracks={}",
        input_path.display(),
        metadata.total_frames,
        metadata.frame_rate,
        metadata.start_timecode,
        metadata.audio_track_count()
    );
    Ok(metadata)
}

/// Like [`extract_metadata`], but a failure degrades to [`MediaMetadata::unknown`].
pub fn extract_or_unknown<P: ProbeExecutor + ?Sized>(prober: &P, input_path: &Path) -> MediaMetadata {
    match extract_metadata(prober, input_path) {
        Ok(metadata) => metadata,
        Err(e) => {
            log::warn!("{}; progress will be indeterminate", e);
            MediaMetadata::unknown()
        }
    }
}
