//! FFprobe integration.
//!
//! Runs ffprobe with JSON output for both the container and every stream.
//! Stream tags carry the start timecode for most camera formats; MXF puts it
//! on the format instead, so both sections are requested.

use super::{ProbeExecutor, ProbeTool, run_probe_command};
use crate::error::CoreResult;

use std::path::Path;
use std::process::Command;

/// [`ProbeExecutor`] backed by the `ffprobe` binary.
#[derive(Debug, Clone, Default)]
pub struct FfprobeExecutor;

impl FfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl ProbeExecutor for FfprobeExecutor {
    fn tool(&self) -> ProbeTool {
        ProbeTool::Ffprobe
    }

    fn run(&self, input_path: &Path) -> CoreResult<String> {
        log::debug!(
            "Running ffprobe for metadata on: {}",
            input_path.display()
        );
        let mut cmd = Command::new(ProbeTool::Ffprobe.program());
        cmd.args(["-v", "error", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(input_path);
        run_probe_command(ProbeTool::Ffprobe, cmd)
    }
}
