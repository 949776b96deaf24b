//! Implementation of the 'probe' subcommand.
//!
//! Runs the configured prober on one file and shows what a transcode would do
//! with it: expected frames, overlay timecode and the codec auto-selection.

use crate::cli::ProbeArgs;
use crate::error::CliResult;
use crate::terminal;

use proxyforge_core::encoding::{CodecChoice, select_codec};
use proxyforge_core::external::{check_probe_dependency, prober_for};
use proxyforge_core::media::unescape_timecode;
use proxyforge_core::{CoreError, MediaMetadata, Platform, extract_metadata};

fn or_unknown<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

/// Status lines shown for a probed file, in display order.
pub fn describe_metadata(metadata: &MediaMetadata, platform: Platform) -> Vec<(&'static str, String)> {
    let selection = select_codec(platform.profile(), CodecChoice::Auto, metadata);
    vec![
        ("Frames", or_unknown(metadata.total_frames)),
        ("Frame rate", or_unknown(metadata.frame_rate)),
        (
            "Timecode",
            or_unknown(metadata.start_timecode.as_deref().map(unescape_timecode)),
        ),
        ("Audio tracks", metadata.audio_track_count().to_string()),
        (
            "Auto codec",
            format!("{} ({})", selection.codec, selection.codec_id),
        ),
    ]
}

pub fn run_probe(args: &ProbeArgs) -> CliResult<()> {
    if !args.file.is_file() {
        return Err(CoreError::PathError(format!(
            "'{}' is not a file",
            args.file.display()
        )));
    }
    check_probe_dependency(args.probe_tool)?;

    let prober = prober_for(args.probe_tool);
    let metadata = extract_metadata(&*prober, &args.file)?;

    terminal::print_section(&args.file.display().to_string());
    for (label, value) in describe_metadata(&metadata, Platform::current()) {
        terminal::print_status(label, &value, false);
    }
    Ok(())
}
