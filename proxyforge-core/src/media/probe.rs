//! Parsing of prober JSON output into a tool-independent track list.
//!
//! MediaInfo and ffprobe disagree on almost every field name, on whether
//! numbers are quoted, and on where the start timecode lives. Both are reduced
//! here to a list of [`ProbeTrack`]s; the resolution rules in
//! [`super::metadata`] only ever look at that list.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::external::ProbeTool;

/// Kind of a probed track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackKind {
    /// Container-level pseudo track (MediaInfo "General", ffprobe "format")
    General,
    Video,
    Audio,
    /// Timecode tracks, data streams, menus, text
    #[default]
    Other,
}

impl From<&str> for TrackKind {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "general" | "format" => TrackKind::General,
            "video" => TrackKind::Video,
            "audio" => TrackKind::Audio,
            _ => TrackKind::Other,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::General => write!(f, "General"),
            TrackKind::Video => write!(f, "Video"),
            TrackKind::Audio => write!(f, "Audio"),
            TrackKind::Other => write!(f, "Other"),
        }
    }
}

/// One track as reported by either prober, with numbers already parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeTrack {
    pub kind: TrackKind,
    pub frame_count: Option<u64>,
    pub frame_rate: Option<f64>,
    pub duration_secs: Option<f64>,
    pub timecode: Option<String>,
}

impl ProbeTrack {
    fn is(&self, kind: TrackKind) -> bool {
        self.kind == kind
    }
}

/// Parsed prober output: normalized tracks plus the untouched JSON payload.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub tool: ProbeTool,
    pub tracks: Vec<ProbeTrack>,
    pub raw: Value,
}

impl ProbeReport {
    /// First video track, the one whose fields win when several tracks report.
    pub fn primary_video(&self) -> Option<&ProbeTrack> {
        self.tracks.iter().find(|t| t.is(TrackKind::Video))
    }

    pub fn tracks_of(&self, kind: TrackKind) -> impl Iterator<Item = &ProbeTrack> {
        self.tracks.iter().filter(move |t| t.is(kind))
    }
}

/// Parses `text` according to the output format of `tool`.
pub fn parse_probe_output(tool: ProbeTool, text: &str) -> CoreResult<ProbeReport> {
    match tool {
        ProbeTool::MediaInfo => parse_mediainfo(text),
        ProbeTool::Ffprobe => parse_ffprobe(text),
    }
}

// ============================================================================
// MEDIAINFO
// ============================================================================

#[derive(Debug, Deserialize)]
struct MediaInfoResponse {
    media: Option<MediaInfoMedia>,
}

#[derive(Debug, Deserialize)]
struct MediaInfoMedia {
    #[serde(default)]
    track: Vec<MediaInfoTrack>,
}

#[derive(Debug, Deserialize)]
struct MediaInfoTrack {
    #[serde(rename = "@type")]
    track_type: String,
    #[serde(rename = "FrameCount")]
    frame_count: Option<Value>,
    #[serde(rename = "FrameRate")]
    frame_rate: Option<Value>,
    #[serde(rename = "Duration")]
    duration: Option<Value>,
    #[serde(rename = "TimeCode_FirstFrame")]
    timecode_first_frame: Option<String>,
}

/// Parses `mediainfo --Output=JSON` output.
pub fn parse_mediainfo(text: &str) -> CoreResult<ProbeReport> {
    let raw: Value = parse_json(ProbeTool::MediaInfo, text)?;
    let response: MediaInfoResponse = serde_json::from_value(raw.clone()).map_err(|e| {
        CoreError::JsonParseError(format!("unexpected mediainfo JSON layout: {e}"))
    })?;
    let media = response.media.ok_or_else(|| {
        CoreError::JsonParseError("mediainfo reported no media (unreadable file?)".to_string())
    })?;

    let tracks = media
        .track
        .into_iter()
        .map(|track| ProbeTrack {
            kind: TrackKind::from(track.track_type.as_str()),
            frame_count: track.frame_count.as_ref().and_then(value_as_u64),
            frame_rate: track.frame_rate.as_ref().and_then(value_as_rate),
            duration_secs: track.duration.as_ref().and_then(value_as_f64),
            timecode: track.timecode_first_frame.filter(|tc| !tc.trim().is_empty()),
        })
        .collect();

    Ok(ProbeReport {
        tool: ProbeTool::MediaInfo,
        tracks,
        raw,
    })
}

// ============================================================================
// FFPROBE
// ============================================================================

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    nb_frames: Option<Value>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    duration: Option<Value>,
    #[serde(default)]
    tags: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<Value>,
    #[serde(default)]
    tags: HashMap<String, Value>,
}

/// Parses `ffprobe -print_format json -show_format -show_streams` output.
pub fn parse_ffprobe(text: &str) -> CoreResult<ProbeReport> {
    let raw: Value = parse_json(ProbeTool::Ffprobe, text)?;
    let output: FfprobeOutput = serde_json::from_value(raw.clone()).map_err(|e| {
        CoreError::JsonParseError(format!("unexpected ffprobe JSON layout: {e}"))
    })?;

    let mut tracks: Vec<ProbeTrack> = output
        .streams
        .into_iter()
        .map(|stream| {
            let frame_rate = stream
                .avg_frame_rate
                .as_deref()
                .and_then(parse_rational)
                .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rational));
            ProbeTrack {
                kind: stream.codec_type.as_deref().map_or(TrackKind::Other, TrackKind::from),
                frame_count: stream.nb_frames.as_ref().and_then(value_as_u64),
                frame_rate,
                duration_secs: stream.duration.as_ref().and_then(value_as_f64),
                timecode: tag_timecode(&stream.tags),
            }
        })
        .collect();

    if let Some(format) = output.format {
        tracks.push(ProbeTrack {
            kind: TrackKind::General,
            frame_count: None,
            frame_rate: None,
            duration_secs: format.duration.as_ref().and_then(value_as_f64),
            timecode: tag_timecode(&format.tags),
        });
    }

    Ok(ProbeReport {
        tool: ProbeTool::Ffprobe,
        tracks,
        raw,
    })
}

fn tag_timecode(tags: &HashMap<String, Value>) -> Option<String> {
    tags.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("timecode"))
        .and_then(|(_, value)| value.as_str())
        .map(str::to_string)
        .filter(|tc| !tc.trim().is_empty())
}

// ============================================================================
// VALUE HELPERS
// ============================================================================

fn parse_json(tool: ProbeTool, text: &str) -> CoreResult<Value> {
    serde_json::from_str(text)
        .map_err(|e| CoreError::JsonParseError(format!("failed to parse {tool} output: {e}")))
}

/// Numbers arrive either as JSON numbers or as quoted strings.
fn value_as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn value_as_rate(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) if s.contains('/') => parse_rational(s),
        other => value_as_f64(other).filter(|rate| *rate > 0.0),
    }
}

/// Parses `num/den` (e.g. `30000/1001`); zero denominators and rates yield `None`.
#[must_use]
pub fn parse_rational(text: &str) -> Option<f64> {
    let (num, den) = text.trim().split_once('/')?;
    let num = num.trim().parse::<f64>().ok()?;
    let den = den.trim().parse::<f64>().ok()?;
    if den == 0.0 {
        return None;
    }
    let rate = num / den;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}
