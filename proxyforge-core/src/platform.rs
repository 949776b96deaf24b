//! Platform detection and the per-platform encoder/font table.
//!
//! Every OS-dependent choice the command builder needs lives in one static
//! [`PlatformProfile`] row. The row is selected once at startup and carried in
//! [`crate::CoreConfig`], so nothing downstream branches on the OS name.

use std::env;
use std::fmt;

/// Target platform the encoder runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Other,
}

impl Platform {
    /// Detects the platform this binary was built for.
    #[must_use]
    pub fn current() -> Self {
        Self::from_os_name(env::consts::OS)
    }

    /// Maps a `std::env::consts::OS` style name onto a platform.
    #[must_use]
    pub fn from_os_name(os: &str) -> Self {
        match os {
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            _ => Platform::Other,
        }
    }

    /// Returns the encoder/font row for this platform.
    #[must_use]
    pub fn profile(self) -> &'static PlatformProfile {
        PlatformProfile::for_platform(self)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::MacOs => "macOS",
            Platform::Windows => "Windows",
            Platform::Linux => "Linux",
            Platform::Other => "other",
        };
        f.write_str(name)
    }
}

/// Concrete encoder backends and overlay font for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    pub platform: Platform,
    /// Encoder for the compressed interchange codec (HEVC).
    pub compressed_encoder: &'static str,
    /// Encoder for the near-lossless intermediate codec (ProRes).
    pub intermediate_encoder: &'static str,
    /// Font file handed to the drawtext overlays.
    pub font_file: &'static str,
    /// Whether the compressed encoder is hardware accelerated.
    pub hardware_accelerated: bool,
}

static PROFILES: [PlatformProfile; 4] = [
    PlatformProfile {
        platform: Platform::MacOs,
        compressed_encoder: "hevc_videotoolbox",
        intermediate_encoder: "prores_videotoolbox",
        font_file: "/System/Library/Fonts/Menlo.ttc",
        hardware_accelerated: true,
    },
    PlatformProfile {
        platform: Platform::Windows,
        compressed_encoder: "hevc_nvenc",
        intermediate_encoder: "prores_ks",
        font_file: "C:/Windows/Fonts/consola.ttf",
        hardware_accelerated: true,
    },
    PlatformProfile {
        platform: Platform::Linux,
        compressed_encoder: "libx265",
        intermediate_encoder: "prores_ks",
        font_file: "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        hardware_accelerated: false,
    },
    PlatformProfile {
        platform: Platform::Other,
        compressed_encoder: "libx265",
        intermediate_encoder: "prores_ks",
        font_file: "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        hardware_accelerated: false,
    },
];

impl PlatformProfile {
    #[must_use]
    pub fn for_platform(platform: Platform) -> &'static PlatformProfile {
        PROFILES
            .iter()
            .find(|p| p.platform == platform)
            .unwrap_or(&PROFILES[3])
    }

    /// Logs which encoders will be used.
    pub fn log_capabilities(&self) {
        if self.hardware_accelerated {
            log::info!(
                "Encoders ({}): {} (hardware), {}",
                self.platform,
                self.compressed_encoder,
                self.intermediate_encoder
            );
        } else {
            log::info!(
                "Encoders ({}): {} (software), {}",
                self.platform,
                self.compressed_encoder,
                self.intermediate_encoder
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_name_mapping() {
        assert_eq!(Platform::from_os_name("macos"), Platform::MacOs);
        assert_eq!(Platform::from_os_name("windows"), Platform::Windows);
        assert_eq!(Platform::from_os_name("linux"), Platform::Linux);
        assert_eq!(Platform::from_os_name("freebsd"), Platform::Other);
    }

    #[test]
    fn test_consumer_platforms_use_hardware_hevc() {
        assert_eq!(Platform::MacOs.profile().compressed_encoder, "hevc_videotoolbox");
        assert_eq!(Platform::Windows.profile().compressed_encoder, "hevc_nvenc");
        assert!(Platform::MacOs.profile().hardware_accelerated);
        assert!(Platform::Windows.profile().hardware_accelerated);
    }

    #[test]
    fn test_software_fallback_elsewhere() {
        for platform in [Platform::Linux, Platform::Other] {
            let profile = platform.profile();
            assert_eq!(profile.compressed_encoder, "libx265");
            assert_eq!(profile.intermediate_encoder, "prores_ks");
            assert!(!profile.hardware_accelerated);
        }
    }

    #[test]
    fn test_every_platform_has_a_row() {
        for platform in [Platform::MacOs, Platform::Windows, Platform::Linux, Platform::Other] {
            assert_eq!(PlatformProfile::for_platform(platform).platform, platform);
        }
    }
}
