// ============================================================================
// proxyforge-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// Traits for spawning the encoder and reading its live progress stream, plus
// the production implementation on top of ffmpeg-sidecar. The command builder
// routes `-progress` output to standard error, so the stream handed to the
// monitor is the child's stderr: progress key/value lines interleaved with
// ordinary ffmpeg diagnostics.

use crate::error::{CoreResult, command_start_error, command_wait_error};

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;

use std::io::{self, BufRead, BufReader};
use std::process::ExitStatus;

/// An encoder child process whose progress stream can be consumed once.
pub trait EncoderProcess {
    /// Takes the live, line-oriented progress stream. Subsequent calls fail.
    fn take_progress_stream(&mut self) -> CoreResult<Box<dyn BufRead + Send>>;

    /// Waits for the child to exit and returns its status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Something that can launch the encoder with a prepared argument list.
pub trait EncoderSpawner {
    type Process: EncoderProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process>;
}

impl<S: EncoderSpawner + ?Sized> EncoderSpawner for &S {
    type Process = S::Process;

    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process> {
        (**self).spawn(args)
    }
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around an ffmpeg-sidecar child implementing [`EncoderProcess`].
pub struct SidecarProcess(FfmpegChild);

impl EncoderProcess for SidecarProcess {
    fn take_progress_stream(&mut self) -> CoreResult<Box<dyn BufRead + Send>> {
        let stderr = self.0.take_stderr().ok_or_else(|| {
            command_start_error(
                "ffmpeg (sidecar)",
                io::Error::new(io::ErrorKind::BrokenPipe, "stderr already taken"),
            )
        })?;
        Ok(Box::new(BufReader::new(stderr)))
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Production [`EncoderSpawner`] using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl EncoderSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process> {
        log::debug!("Spawning ffmpeg {}", args.join(" "));
        let mut cmd = FfmpegCommand::new();
        cmd.args(args);
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}
