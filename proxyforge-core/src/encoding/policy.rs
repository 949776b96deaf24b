//! Codec policy: which logical proxy codec an item gets, and how the platform
//! realises it.

use std::fmt;
use std::str::FromStr;

use crate::config::AUDIO_TRACK_THRESHOLD;
use crate::error::CoreError;
use crate::media::MediaMetadata;
use crate::platform::PlatformProfile;

/// The user's codec choice for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodecChoice {
    /// Always the compressed interchange codec (HEVC).
    Compressed,
    /// Always the near-lossless intermediate codec (ProRes).
    Intermediate,
    /// Decide per item from its audio track count.
    #[default]
    Auto,
}

impl FromStr for CodecChoice {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compressed" | "hevc" | "h265" => Ok(CodecChoice::Compressed),
            "intermediate" | "prores" => Ok(CodecChoice::Intermediate),
            "auto" => Ok(CodecChoice::Auto),
            other => Err(CoreError::Config(format!(
                "unknown codec choice '{other}' (expected compressed, intermediate or auto)"
            ))),
        }
    }
}

impl fmt::Display for CodecChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodecChoice::Compressed => "compressed",
            CodecChoice::Intermediate => "intermediate",
            CodecChoice::Auto => "auto",
        })
    }
}

/// The logical codec selected for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyCodec {
    Compressed,
    Intermediate,
}

impl fmt::Display for ProxyCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProxyCodec::Compressed => "HEVC",
            ProxyCodec::Intermediate => "ProRes Proxy",
        })
    }
}

/// Ordered `(flag, value)` pairs appended after the universal encoder flags.
pub type CodecParameters = Vec<(String, String)>;

/// Output of [`select_codec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecSelection {
    pub codec: ProxyCodec,
    pub codec_id: String,
    pub codec_parameters: CodecParameters,
}

/// Resolves the logical codec for one item.
///
/// Automatic choice routes items with more than [`AUDIO_TRACK_THRESHOLD`]
/// audio tracks to the intermediate codec; unknown metadata counts as zero
/// tracks.
#[must_use]
pub fn resolve_codec(choice: CodecChoice, metadata: &MediaMetadata) -> ProxyCodec {
    match choice {
        CodecChoice::Compressed => ProxyCodec::Compressed,
        CodecChoice::Intermediate => ProxyCodec::Intermediate,
        CodecChoice::Auto => {
            if metadata.audio_track_count() > AUDIO_TRACK_THRESHOLD {
                ProxyCodec::Intermediate
            } else {
                ProxyCodec::Compressed
            }
        }
    }
}

/// Selects the encoder id and codec-specific flags. Pure, no I/O.
#[must_use]
pub fn select_codec(
    profile: &PlatformProfile,
    choice: CodecChoice,
    metadata: &MediaMetadata,
) -> CodecSelection {
    let codec = resolve_codec(choice, metadata);
    let (codec_id, codec_parameters) = match codec {
        ProxyCodec::Compressed => (profile.compressed_encoder, Vec::new()),
        ProxyCodec::Intermediate => (
            profile.intermediate_encoder,
            intermediate_parameters(profile.intermediate_encoder),
        ),
    };
    CodecSelection {
        codec,
        codec_id: codec_id.to_string(),
        codec_parameters,
    }
}

/// ProRes Proxy profile, 10-bit 4:2:2, BT.709 tagging and PCM audio.
fn intermediate_parameters(encoder: &str) -> CodecParameters {
    let mut params: Vec<(&str, &str)> = vec![("-profile:v", "0")];
    if encoder == "prores_videotoolbox" {
        params.push(("-pix_fmt", "p210le"));
    } else {
        params.extend([
            ("-vendor", "apl0"),
            ("-qscale:v", "9"),
            ("-pix_fmt", "yuv422p10le"),
        ]);
    }
    params.extend([
        ("-color_primaries", "bt709"),
        ("-color_trc", "bt709"),
        ("-colorspace", "bt709"),
        ("-c:a", "pcm_s16le"),
    ]);
    params
        .into_iter()
        .map(|(flag, value)| (flag.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::ProbeTool;
    use crate::media::RawProbeData;
    use crate::platform::Platform;
    use serde_json::json;

    fn with_audio_tracks(count: usize) -> MediaMetadata {
        let mut tracks = vec![json!({"@type": "General"}), json!({"@type": "Video"})];
        tracks.extend((0..count).map(|_| json!({"@type": "Audio"})));
        MediaMetadata {
            raw_probe_data: Some(RawProbeData {
                tool: ProbeTool::MediaInfo,
                payload: json!({"media": {"track": tracks}}),
            }),
            ..MediaMetadata::default()
        }
    }

    #[test]
    fn test_auto_threshold_is_strictly_greater() {
        assert_eq!(resolve_codec(CodecChoice::Auto, &with_audio_tracks(5)), ProxyCodec::Intermediate);
        assert_eq!(resolve_codec(CodecChoice::Auto, &with_audio_tracks(4)), ProxyCodec::Compressed);
        assert_eq!(resolve_codec(CodecChoice::Auto, &with_audio_tracks(2)), ProxyCodec::Compressed);
        assert_eq!(resolve_codec(CodecChoice::Auto, &MediaMetadata::unknown()), ProxyCodec::Compressed);
    }

    #[test]
    fn test_forced_choice_ignores_track_count() {
        assert_eq!(
            resolve_codec(CodecChoice::Compressed, &with_audio_tracks(8)),
            ProxyCodec::Compressed
        );
        assert_eq!(
            resolve_codec(CodecChoice::Intermediate, &with_audio_tracks(1)),
            ProxyCodec::Intermediate
        );
    }

    #[test]
    fn test_compressed_has_no_extra_parameters() {
        let selection = select_codec(
            Platform::MacOs.profile(),
            CodecChoice::Compressed,
            &MediaMetadata::unknown(),
        );
        assert_eq!(selection.codec_id, "hevc_videotoolbox");
        assert!(selection.codec_parameters.is_empty());
    }

    #[test]
    fn test_software_prores_parameters() {
        let selection = select_codec(
            Platform::Linux.profile(),
            CodecChoice::Auto,
            &with_audio_tracks(6),
        );
        assert_eq!(selection.codec, ProxyCodec::Intermediate);
        assert_eq!(selection.codec_id, "prores_ks");
        let flags: Vec<&str> = selection
            .codec_parameters
            .iter()
            .map(|(flag, _)| flag.as_str())
            .collect();
        assert_eq!(
            flags,
            [
                "-profile:v",
                "-vendor",
                "-qscale:v",
                "-pix_fmt",
                "-color_primaries",
                "-color_trc",
                "-colorspace",
                "-c:a"
            ]
        );
        assert!(selection
            .codec_parameters
            .contains(&("-pix_fmt".to_string(), "yuv422p10le".to_string())));
    }

    #[test]
    fn test_videotoolbox_prores_uses_p210() {
        let selection = select_codec(
            Platform::MacOs.profile(),
            CodecChoice::Intermediate,
            &MediaMetadata::unknown(),
        );
        assert_eq!(selection.codec_id, "prores_videotoolbox");
        assert!(selection
            .codec_parameters
            .contains(&("-pix_fmt".to_string(), "p210le".to_string())));
        assert!(!selection.codec_parameters.iter().any(|(flag, _)| flag == "-vendor"));
    }

    #[test]
    fn test_codec_choice_parsing() {
        assert_eq!("HEVC".parse::<CodecChoice>().unwrap(), CodecChoice::Compressed);
        assert_eq!("prores".parse::<CodecChoice>().unwrap(), CodecChoice::Intermediate);
        assert_eq!("auto".parse::<CodecChoice>().unwrap(), CodecChoice::Auto);
        assert!("vp9".parse::<CodecChoice>().is_err());
    }
}
