// proxyforge-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use proxyforge_core::encoding::CodecChoice;
use proxyforge_core::external::ProbeTool;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Proxyforge: batch proxy transcoding for camera footage",
    long_about = "Mirrors a footage tree into a tree of lightweight editing proxies, \
                  burning in the file name and source timecode, using ffmpeg via proxyforge-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug output on the console (RUST_LOG overrides this)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcodes every footage file under FOOTAGE_ROOT into PROXY_ROOT
    Transcode(TranscodeArgs),
    /// Prints the metadata a single file would be transcoded with
    Probe(ProbeArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct TranscodeArgs {
    /// Directory whose subdirectories hold camera footage
    #[arg(required = true, value_name = "FOOTAGE_ROOT")]
    pub footage_root: PathBuf,

    /// Directory where the mirrored proxy tree is written
    #[arg(required = true, value_name = "PROXY_ROOT")]
    pub proxy_root: PathBuf,

    /// Optional: Directory for log files (defaults to PROXY_ROOT/logs)
    #[arg(short, long, value_name = "LOG_DIR", env = "PROXYFORGE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    // --- Codec Selection ---
    /// Proxy codec: compressed (HEVC), intermediate (ProRes Proxy) or auto
    #[arg(short, long, value_name = "CODEC", default_value = "auto", env = "PROXYFORGE_CODEC")]
    pub codec: CodecChoice,

    /// Tool used to read frame count, frame rate and timecode
    #[arg(long, value_name = "TOOL", default_value = "mediainfo", env = "PROXYFORGE_PROBE_TOOL")]
    pub probe_tool: ProbeTool,

    // --- Encode Overrides ---
    /// Optional: Maximum proxy width in pixels (never upscales)
    #[arg(long, value_name = "PIXELS", value_parser = clap::value_parser!(u32).range(2..))]
    pub max_width: Option<u32>,

    /// Optional: Target video bitrate (e.g. 5000k)
    #[arg(long, value_name = "RATE")]
    pub video_bitrate: Option<String>,

    /// Optional: Audio encoder passed to ffmpeg's -c:a
    #[arg(long, value_name = "ENCODER")]
    pub audio_codec: Option<String>,

    /// Optional: Target audio bitrate (e.g. 160k)
    #[arg(long, value_name = "RATE")]
    pub audio_bitrate: Option<String>,

    /// Optional: Proxy container extension (defaults to mov)
    #[arg(long, value_name = "EXT", env = "PROXYFORGE_EXTENSION")]
    pub extension: Option<String>,

    /// Do not burn the file name and timecode into the picture
    #[arg(long, default_value_t = false)]
    pub no_overlays: bool,

    /// Emit machine-readable JSON progress lines on stdout instead of progress bars
    #[arg(long, default_value_t = false)]
    pub json_progress: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ProbeArgs {
    /// Footage file to inspect
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,

    /// Tool used to read the metadata
    #[arg(long, value_name = "TOOL", default_value = "mediainfo", env = "PROXYFORGE_PROBE_TOOL")]
    pub probe_tool: ProbeTool,
}
