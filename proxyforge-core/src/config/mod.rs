//! Configuration structures and constants for the proxyforge-core library.
//!
//! This module provides the configuration system for a proxy batch: where the
//! footage lives, where proxies go, which codec policy to apply and the
//! universal encoder defaults.

mod builder;

use std::path::PathBuf;

use crate::encoding::CodecChoice;
use crate::error::{CoreError, CoreResult};
use crate::external::ProbeTool;
use crate::platform::Platform;

pub use builder::CoreConfigBuilder;

// Default constants

/// Proxies are scaled down to at most this width; narrower footage is kept as is.
pub const DEFAULT_MAX_WIDTH: u32 = 1920;

/// Video bitrate for the compressed proxy codec.
pub const DEFAULT_VIDEO_BITRATE: &str = "5000k";

/// Pixel format for the compressed proxy codec.
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";

/// Audio encoder applied to every mapped audio stream.
pub const DEFAULT_AUDIO_CODEC: &str = "libmp3lame";

/// Bitrate for each encoded audio stream.
pub const DEFAULT_AUDIO_BITRATE: &str = "160k";

/// Container extension of written proxy files.
pub const DEFAULT_PROXY_EXTENSION: &str = "mov";

/// Automatic codec policy switches to the intermediate codec above this many
/// audio tracks.
pub const AUDIO_TRACK_THRESHOLD: usize = 4;

/// Source extensions picked up by discovery (compared case-insensitively).
pub const FOOTAGE_EXTENSIONS: [&str; 3] = ["mp4", "mov", "mxf"];

/// Main configuration structure for the proxyforge-core library.
///
/// Typically created by the CLI and passed to [`crate::process_items`].
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Root whose immediate sub-directories hold the footage
    pub footage_root: PathBuf,

    /// Root under which the proxy tree is mirrored
    pub proxy_root: PathBuf,

    /// Directory for run log files
    pub log_dir: PathBuf,

    /// User codec choice (forced or automatic)
    pub codec_choice: CodecChoice,

    /// Platform used to look up encoder backends and overlay font
    pub platform: Platform,

    /// Maximum proxy width in pixels
    pub max_width: u32,

    pub video_bitrate: String,
    pub audio_codec: String,
    pub audio_bitrate: String,

    /// Extension of proxy files, without the dot
    pub proxy_extension: String,

    /// Which probing tool supplies metadata
    pub probe_tool: ProbeTool,

    /// Burn filename and timecode overlays when a timecode is known
    pub burn_overlays: bool,
}

impl CoreConfig {
    /// Creates a configuration with default settings for the given directories.
    #[must_use]
    pub fn new(footage_root: PathBuf, proxy_root: PathBuf, log_dir: PathBuf) -> Self {
        Self {
            footage_root,
            proxy_root,
            log_dir,
            codec_choice: CodecChoice::Auto,
            platform: Platform::current(),
            max_width: DEFAULT_MAX_WIDTH,
            video_bitrate: DEFAULT_VIDEO_BITRATE.to_string(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
            proxy_extension: DEFAULT_PROXY_EXTENSION.to_string(),
            probe_tool: ProbeTool::MediaInfo,
            burn_overlays: true,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_width == 0 {
            return Err(CoreError::Config("max_width must be greater than zero".to_string()));
        }
        if self.max_width % 2 != 0 {
            return Err(CoreError::Config(format!(
                "max_width must be even, got {}",
                self.max_width
            )));
        }
        let extension = self.proxy_extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(CoreError::Config("proxy_extension must not be empty".to_string()));
        }
        for (name, value) in [
            ("video_bitrate", &self.video_bitrate),
            ("audio_codec", &self.audio_codec),
            ("audio_bitrate", &self.audio_bitrate),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Config(format!("{name} must not be empty")));
            }
        }
        if self.footage_root == self.proxy_root {
            return Err(CoreError::Config(format!(
                "proxy root must differ from footage root ({})",
                self.footage_root.display()
            )));
        }
        // Discovery would pick old proxies up as a footage group.
        if self.proxy_root.starts_with(&self.footage_root) {
            return Err(CoreError::Config(format!(
                "proxy root {} must not be inside footage root {}",
                self.proxy_root.display(),
                self.footage_root.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CoreConfig {
        CoreConfig::new(
            PathBuf::from("/footage"),
            PathBuf::from("/proxies"),
            PathBuf::from("/proxies/logs"),
        )
    }

    #[test]
    fn test_defaults_validate() {
        let config = config();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_width, 1920);
        assert_eq!(config.proxy_extension, "mov");
        assert_eq!(config.codec_choice, CodecChoice::Auto);
    }

    #[test]
    fn test_rejects_zero_and_odd_width() {
        let mut config = config();
        config.max_width = 0;
        assert!(config.validate().is_err());
        config.max_width = 1279;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_same_roots() {
        let mut config = config();
        config.proxy_root = config.footage_root.clone();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_rejects_proxy_root_inside_footage_root() {
        let mut config = config();
        config.proxy_root = config.footage_root.join("proxies");
        match config.validate() {
            Err(CoreError::Config(msg)) => assert!(msg.contains("must not be inside"), "{msg}"),
            other => panic!("Unexpected result: {other:?}"),
        }

        // A sibling whose name merely shares a prefix is fine.
        config.proxy_root = PathBuf::from("/footage_proxies");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_extension() {
        let mut config = config();
        config.proxy_extension = ".".to_string();
        assert!(config.validate().is_err());
    }
}
