//! Encoder invocation building.
//!
//! [`EncodePlan::derive`] turns metadata and the batch configuration into the
//! per-item codec and filter decisions; [`CommandBuilder::build`] renders a
//! plan into the ffmpeg argument list. Neither touches the filesystem or
//! spawns anything, so identical inputs always give identical arguments.
//!
//! Argument order matters: the codec parameters from the policy come after
//! the universal video/audio flags so ffmpeg lets them override the default
//! bitrate, pixel format and audio codec.

use crate::config::{CoreConfig, DEFAULT_PIXEL_FORMAT};
use crate::discovery::SourceItem;
use crate::media::MediaMetadata;

use super::policy::{CodecParameters, ProxyCodec, select_codec};

/// Per-item encoding decisions. Recomputed for every item, never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodePlan {
    pub codec: ProxyCodec,
    pub codec_id: String,
    pub codec_parameters: CodecParameters,
    /// Filters in application order, joined with `,` on the command line.
    pub filter_graph: Vec<String>,
}

impl EncodePlan {
    /// Derives the plan for `item` from its metadata and the batch settings.
    #[must_use]
    pub fn derive(config: &CoreConfig, item: &SourceItem, metadata: &MediaMetadata) -> Self {
        let profile = config.platform.profile();
        let selection = select_codec(profile, config.codec_choice, metadata);

        let mut filters = VideoFilterChain::new().add_filter(scale_filter(config.max_width));
        if config.burn_overlays {
            if let (Some(timecode), Some(rate)) = (&metadata.start_timecode, metadata.frame_rate) {
                filters = filters
                    .add_filter(filename_overlay(profile.font_file, &item.file_name()))
                    .add_filter(timecode_overlay(profile.font_file, timecode, rate));
            } else {
                log::debug!(
                    "No timecode/rate for {}; skipping overlays",
                    item.source_path().display()
                );
            }
        }

        EncodePlan {
            codec: selection.codec,
            codec_id: selection.codec_id,
            codec_parameters: selection.codec_parameters,
            filter_graph: filters.build(),
        }
    }

    /// The `-vf` argument value.
    #[must_use]
    pub fn filter_arg(&self) -> String {
        self.filter_graph.join(",")
    }
}

/// Ordered list of filter expressions.
#[derive(Debug, Default)]
pub struct VideoFilterChain {
    filters: Vec<String>,
}

impl VideoFilterChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `filter` unless it is empty.
    #[must_use]
    pub fn add_filter(mut self, filter: String) -> Self {
        if !filter.is_empty() {
            self.filters.push(filter);
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<String> {
        self.filters
    }
}

/// Downscale to at most `max_width`, keeping aspect and an even height.
#[must_use]
pub fn scale_filter(max_width: u32) -> String {
    format!("scale='min({max_width},iw)':-2")
}

/// Source filename burned in at the top left.
#[must_use]
pub fn filename_overlay(font_file: &str, file_name: &str) -> String {
    format!(
        "drawtext=fontfile={}:text={}:expansion=none:x=10:y=10:{}",
        escape_filter_text(font_file),
        escape_filter_text(file_name),
        OVERLAY_STYLE
    )
}

/// Running timecode burned in at the top right, wrapping at 24 hours.
///
/// `timecode` must already be escaped (see [`crate::media::normalize_timecode`]).
#[must_use]
pub fn timecode_overlay(font_file: &str, timecode: &str, rate: u32) -> String {
    format!(
        "drawtext=fontfile={}:timecode='{}':timecode_rate={}:tc24hmax=1:x=w-tw-10:y=10:{}",
        escape_filter_text(font_file),
        timecode,
        rate,
        OVERLAY_STYLE
    )
}

const OVERLAY_STYLE: &str = "fontsize=h/28:fontcolor=white:box=1:boxcolor=black@0.5:boxborderw=6";

/// Escapes a free-text option value for use inside a `-vf` graph.
///
/// ffmpeg unescapes twice: once when splitting the graph into filters and
/// once when splitting a filter's options.
#[must_use]
pub fn escape_filter_text(value: &str) -> String {
    escape_chars(&escape_chars(value, &['\\', '\'', ':']), &['\\', '\'', '[', ']', ',', ';'])
}

fn escape_chars(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Renders [`EncodePlan`]s into ffmpeg argument lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    video_bitrate: String,
    pixel_format: String,
    audio_codec: String,
    audio_bitrate: String,
}

impl CommandBuilder {
    #[must_use]
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            video_bitrate: config.video_bitrate.clone(),
            pixel_format: DEFAULT_PIXEL_FORMAT.to_string(),
            audio_codec: config.audio_codec.clone(),
            audio_bitrate: config.audio_bitrate.clone(),
        }
    }

    /// Builds the full argument list (without the program name).
    #[must_use]
    pub fn build(&self, item: &SourceItem, plan: &EncodePlan) -> Vec<String> {
        let mut args: Vec<String> = Vec::with_capacity(32 + plan.codec_parameters.len() * 2);

        args.extend(["-y", "-nostdin"].map(String::from));
        args.push("-i".to_string());
        args.push(item.source_path().to_string_lossy().into_owned());

        if !plan.filter_graph.is_empty() {
            args.push("-vf".to_string());
            args.push(plan.filter_arg());
        }

        args.extend([
            "-c:v".to_string(),
            plan.codec_id.clone(),
            "-b:v".to_string(),
            self.video_bitrate.clone(),
            "-pix_fmt".to_string(),
            self.pixel_format.clone(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-b:a".to_string(),
            self.audio_bitrate.clone(),
        ]);

        // One video stream, every audio stream (if any).
        args.extend(["-map", "0:v:0", "-map", "0:a?"].map(String::from));

        // Machine-readable progress on stderr, without the `\r` stats line.
        args.extend(["-nostats", "-progress", "pipe:2"].map(String::from));

        for (flag, value) in &plan.codec_parameters {
            args.push(flag.clone());
            args.push(value.clone());
        }

        args.push(item.output_path().to_string_lossy().into_owned());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CodecChoice;
    use crate::platform::Platform;
    use std::path::PathBuf;

    fn config(choice: CodecChoice) -> CoreConfig {
        let mut config = CoreConfig::new(
            PathBuf::from("/footage"),
            PathBuf::from("/proxies"),
            PathBuf::from("/proxies/logs"),
        );
        config.platform = Platform::Linux;
        config.codec_choice = choice;
        config
    }

    fn item() -> SourceItem {
        SourceItem::new(
            PathBuf::from("/footage/day1/A001_C002.MXF"),
            "day1",
            PathBuf::from("/proxies/day1/A001_C002.mov"),
        )
    }

    fn timed_metadata() -> MediaMetadata {
        MediaMetadata {
            total_frames: Some(1000),
            frame_rate: Some(25),
            start_timecode: Some(r"01\:00\:00\:00".to_string()),
            raw_probe_data: None,
        }
    }

    fn position(args: &[String], needle: &str) -> usize {
        args.iter()
            .position(|a| a == needle)
            .unwrap_or_else(|| panic!("{needle} missing from {args:?}"))
    }

    #[test]
    fn test_scale_only_without_timecode() {
        let plan = EncodePlan::derive(&config(CodecChoice::Auto), &item(), &MediaMetadata::unknown());
        assert_eq!(plan.filter_graph, vec!["scale='min(1920,iw)':-2".to_string()]);
    }

    #[test]
    fn test_overlays_with_timecode() {
        let plan = EncodePlan::derive(&config(CodecChoice::Auto), &item(), &timed_metadata());
        assert_eq!(plan.filter_graph.len(), 3);
        assert!(plan.filter_graph[1].contains("text=A001_C002.MXF"));
        assert!(plan.filter_graph[1].contains("expansion=none"));
        assert!(plan.filter_graph[2].contains(r"timecode='01\:00\:00\:00'"));
        assert!(plan.filter_graph[2].contains("timecode_rate=25"));
        assert!(plan.filter_graph[2].contains("tc24hmax=1"));
    }

    #[test]
    fn test_overlays_need_frame_rate() {
        let mut metadata = timed_metadata();
        metadata.frame_rate = None;
        let plan = EncodePlan::derive(&config(CodecChoice::Auto), &item(), &metadata);
        assert_eq!(plan.filter_graph.len(), 1);
    }

    #[test]
    fn test_overlays_can_be_disabled() {
        let mut config = config(CodecChoice::Auto);
        config.burn_overlays = false;
        let plan = EncodePlan::derive(&config, &item(), &timed_metadata());
        assert_eq!(plan.filter_graph.len(), 1);
    }

    #[test]
    fn test_filter_text_escaping() {
        assert_eq!(escape_filter_text("plain.mov"), "plain.mov");
        assert_eq!(escape_filter_text("a:b"), r"a\\:b");
        assert_eq!(escape_filter_text("it's"), r"it\\\'s");
        assert_eq!(escape_filter_text("x,y[1];z"), r"x\,y\[1\]\;z");
        assert_eq!(
            escape_filter_text("C:/Windows/Fonts/consola.ttf"),
            r"C\\:/Windows/Fonts/consola.ttf"
        );
    }

    #[test]
    fn test_universal_flags_and_ordering() {
        let config = config(CodecChoice::Intermediate);
        let plan = EncodePlan::derive(&config, &item(), &timed_metadata());
        let args = CommandBuilder::from_config(&config).build(&item(), &plan);

        assert_eq!(&args[..4], ["-y", "-nostdin", "-i", "/footage/day1/A001_C002.MXF"]);
        assert_eq!(args.last().map(String::as_str), Some("/proxies/day1/A001_C002.mov"));
        assert_eq!(args[position(&args, "-c:v") + 1], "prores_ks");
        assert_eq!(args[position(&args, "-progress") + 1], "pipe:2");
        assert!(args.windows(2).any(|w| w == ["-map", "0:v:0"]));
        assert!(args.windows(2).any(|w| w == ["-map", "0:a?"]));

        // Codec parameters must come after the defaults they override.
        let pix_fmts: Vec<usize> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "-pix_fmt")
            .map(|(i, _)| i)
            .collect();
        assert_eq!(pix_fmts.len(), 2);
        assert_eq!(args[pix_fmts[0] + 1], "yuv420p");
        assert_eq!(args[pix_fmts[1] + 1], "yuv422p10le");
        assert!(position(&args, "-qscale:v") > position(&args, "-b:v"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = config(CodecChoice::Auto);
        let builder = CommandBuilder::from_config(&config);
        let first = builder.build(&item(), &EncodePlan::derive(&config, &item(), &timed_metadata()));
        let second = builder.build(&item(), &EncodePlan::derive(&config, &item(), &timed_metadata()));
        assert_eq!(first, second);
    }
}
