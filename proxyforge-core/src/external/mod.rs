// ============================================================================
// proxyforge-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with mediainfo, ffprobe and ffmpeg
//
// The probing tools and the encoder are opaque child processes. This module
// wraps them behind small traits so the rest of the crate (and its tests) can
// run against canned output without any binary installed.
//
// KEY COMPONENTS:
// - ProbeExecutor: runs a prober and returns its raw JSON text
// - EncoderSpawner / EncoderProcess: spawn ffmpeg and expose its progress stream
// - check_dependency: verifies a tool is on PATH before a batch starts

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};

use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::str::FromStr;

// ============================================================================
// SUBMODULES
// ============================================================================

/// Spawning ffmpeg through ffmpeg-sidecar
pub mod ffmpeg_executor;

/// Running ffprobe with JSON output
pub mod ffprobe_executor;

/// Running mediainfo with JSON output
pub mod mediainfo_executor;

pub use ffmpeg_executor::{EncoderProcess, EncoderSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::FfprobeExecutor;
pub use mediainfo_executor::MediaInfoExecutor;

// ============================================================================
// PROBING ABSTRACTION
// ============================================================================

/// Which external probing tool supplies metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProbeTool {
    #[default]
    MediaInfo,
    Ffprobe,
}

impl ProbeTool {
    /// Name of the executable on PATH.
    #[must_use]
    pub fn program(self) -> &'static str {
        match self {
            ProbeTool::MediaInfo => "mediainfo",
            ProbeTool::Ffprobe => "ffprobe",
        }
    }

    /// Argument that makes the tool print its version and exit 0.
    fn version_arg(self) -> &'static str {
        match self {
            ProbeTool::MediaInfo => "--Version",
            ProbeTool::Ffprobe => "-version",
        }
    }
}

impl FromStr for ProbeTool {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mediainfo" => Ok(ProbeTool::MediaInfo),
            "ffprobe" => Ok(ProbeTool::Ffprobe),
            other => Err(CoreError::Config(format!(
                "unknown probe tool '{other}' (expected mediainfo or ffprobe)"
            ))),
        }
    }
}

impl fmt::Display for ProbeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Runs a probing tool against one file and returns its structured stdout.
///
/// Implementations must treat a non-zero exit status as an error; parsing of
/// the returned text happens in [`crate::media`].
pub trait ProbeExecutor {
    /// The tool whose output format [`ProbeExecutor::run`] returns.
    fn tool(&self) -> ProbeTool;

    fn run(&self, input_path: &Path) -> CoreResult<String>;
}

impl<P: ProbeExecutor + ?Sized> ProbeExecutor for &P {
    fn tool(&self) -> ProbeTool {
        (**self).tool()
    }

    fn run(&self, input_path: &Path) -> CoreResult<String> {
        (**self).run(input_path)
    }
}

/// Returns the production executor for `tool`.
#[must_use]
pub fn prober_for(tool: ProbeTool) -> Box<dyn ProbeExecutor> {
    match tool {
        ProbeTool::MediaInfo => Box::new(MediaInfoExecutor::new()),
        ProbeTool::Ffprobe => Box::new(FfprobeExecutor::new()),
    }
}

/// Runs a fully configured probe command, returning stdout as UTF-8 text.
pub(crate) fn run_probe_command(tool: ProbeTool, mut cmd: Command) -> CoreResult<String> {
    log::debug!("Running probe command: {:?}", cmd);

    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|e| command_start_error(tool.program(), e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(command_failed_error(
            tool.program(),
            output.status,
            stderr.trim().to_string(),
        ));
    }

    String::from_utf8(output.stdout).map_err(|e| {
        CoreError::JsonParseError(format!("{} produced non UTF-8 output: {e}", tool.program()))
    })
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that `tool` can be started.
pub fn check_probe_dependency(tool: ProbeTool) -> CoreResult<()> {
    check_dependency(tool.program(), tool.version_arg())
}

/// Checks that ffmpeg can be started.
pub fn check_encoder_dependency() -> CoreResult<()> {
    check_dependency("ffmpeg", "-version")
}

fn check_dependency(cmd_name: &str, version_arg: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg(version_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(command_start_error(cmd_name, e))
        }
    }
}
