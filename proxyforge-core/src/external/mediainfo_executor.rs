//! MediaInfo integration.
//!
//! Runs `mediainfo --Output=JSON` against a footage file. MediaInfo reports
//! `FrameCount`, `FrameRate` and the first-frame timecode directly, which is
//! why it is the default prober for camera originals.

use super::{ProbeExecutor, ProbeTool, run_probe_command};
use crate::error::CoreResult;

use std::path::Path;
use std::process::Command;

/// [`ProbeExecutor`] backed by the `mediainfo` binary.
#[derive(Debug, Clone, Default)]
pub struct MediaInfoExecutor;

impl MediaInfoExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl ProbeExecutor for MediaInfoExecutor {
    fn tool(&self) -> ProbeTool {
        ProbeTool::MediaInfo
    }

    fn run(&self, input_path: &Path) -> CoreResult<String> {
        log::debug!(
            "Running mediainfo for metadata on: {}",
            input_path.display()
        );
        let mut cmd = Command::new(ProbeTool::MediaInfo.program());
        cmd.arg("--Output=JSON").arg(input_path);
        run_probe_command(ProbeTool::MediaInfo, cmd)
    }
}
