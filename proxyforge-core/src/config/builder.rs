// ============================================================================
// proxyforge-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig with defaults for every optional field.
// The footage and proxy roots are required (the log directory defaults to
// <proxy_root>/logs); build() fails when one is missing or when the resulting
// configuration does not validate.

use std::path::PathBuf;

use super::CoreConfig;
use crate::encoding::CodecChoice;
use crate::error::{CoreError, CoreResult};
use crate::external::ProbeTool;
use crate::platform::Platform;

/// Builder for creating [`CoreConfig`] instances.
///
/// # Examples
///
/// ```rust
/// use proxyforge_core::config::CoreConfigBuilder;
/// use proxyforge_core::encoding::CodecChoice;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .footage_root(PathBuf::from("/footage"))
///     .proxy_root(PathBuf::from("/proxies"))
///     .log_dir(PathBuf::from("/proxies/logs"))
///     .codec_choice(CodecChoice::Intermediate)
///     .max_width(1280)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_width, 1280);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    // Required fields
    footage_root: Option<PathBuf>,
    proxy_root: Option<PathBuf>,
    log_dir: Option<PathBuf>,

    // Optional overrides
    codec_choice: Option<CodecChoice>,
    platform: Option<Platform>,
    max_width: Option<u32>,
    video_bitrate: Option<String>,
    audio_codec: Option<String>,
    audio_bitrate: Option<String>,
    proxy_extension: Option<String>,
    probe_tool: Option<ProbeTool>,
    burn_overlays: Option<bool>,
}

impl CoreConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn footage_root(mut self, path: PathBuf) -> Self {
        self.footage_root = Some(path);
        self
    }

    pub fn proxy_root(mut self, path: PathBuf) -> Self {
        self.proxy_root = Some(path);
        self
    }

    pub fn log_dir(mut self, path: PathBuf) -> Self {
        self.log_dir = Some(path);
        self
    }

    pub fn codec_choice(mut self, choice: CodecChoice) -> Self {
        self.codec_choice = Some(choice);
        self
    }

    /// Overrides the detected platform (mainly useful for tests and cross-host planning).
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn video_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.video_bitrate = Some(bitrate.into());
        self
    }

    pub fn audio_codec(mut self, codec: impl Into<String>) -> Self {
        self.audio_codec = Some(codec.into());
        self
    }

    pub fn audio_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.audio_bitrate = Some(bitrate.into());
        self
    }

    pub fn proxy_extension(mut self, extension: impl Into<String>) -> Self {
        self.proxy_extension = Some(extension.into());
        self
    }

    pub fn probe_tool(mut self, tool: ProbeTool) -> Self {
        self.probe_tool = Some(tool);
        self
    }

    pub fn burn_overlays(mut self, enabled: bool) -> Self {
        self.burn_overlays = Some(enabled);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> CoreResult<CoreConfig> {
        let footage_root = self
            .footage_root
            .ok_or_else(|| CoreError::Config("footage_root is required".to_string()))?;
        let proxy_root = self
            .proxy_root
            .ok_or_else(|| CoreError::Config("proxy_root is required".to_string()))?;
        let log_dir = self
            .log_dir
            .unwrap_or_else(|| proxy_root.join("logs"));

        let mut config = CoreConfig::new(footage_root, proxy_root, log_dir);
        if let Some(choice) = self.codec_choice {
            config.codec_choice = choice;
        }
        if let Some(platform) = self.platform {
            config.platform = platform;
        }
        if let Some(width) = self.max_width {
            config.max_width = width;
        }
        if let Some(bitrate) = self.video_bitrate {
            config.video_bitrate = bitrate;
        }
        if let Some(codec) = self.audio_codec {
            config.audio_codec = codec;
        }
        if let Some(bitrate) = self.audio_bitrate {
            config.audio_bitrate = bitrate;
        }
        if let Some(extension) = self.proxy_extension {
            config.proxy_extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(tool) = self.probe_tool {
            config.probe_tool = tool;
        }
        if let Some(enabled) = self.burn_overlays {
            config.burn_overlays = enabled;
        }

        config.validate()?;
        Ok(config)
    }
}
