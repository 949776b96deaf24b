// ============================================================================
// proxyforge-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for proxyforge-core
//
// Probe and encode failures are item-local: the batch coordinator turns them
// into failed outcomes and moves on. Only setup problems (missing tools,
// unreadable footage root, invalid configuration) are fatal to a run.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the proxyforge core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for {0}: {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("{0} exited with {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    /// Prober exited non-zero or produced output that could not be parsed.
    #[error("Probe failed for {}: {reason}", path.display())]
    ProbeFailure { path: PathBuf, reason: String },

    /// Encoder exited non-zero.
    #[error("Encode failed for {}: {detail}", path.display())]
    EncodeFailure { path: PathBuf, detail: String },

    #[error("Required external tool not found: {0}")]
    DependencyNotFound(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Directory walk error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("No footage files found")]
    NoFilesFound,

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A setup step outside the encode pipeline failed (used by front ends).
    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for proxyforge-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

pub fn command_start_error(tool: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(tool.into(), err)
}

pub fn command_wait_error(tool: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(tool.into(), err)
}

pub fn command_failed_error(
    tool: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(tool.into(), status, stderr.into())
}

/// Wraps any probing error for `path` into a [`CoreError::ProbeFailure`].
pub(crate) fn probe_failure(path: &Path, err: CoreError) -> CoreError {
    match err {
        CoreError::ProbeFailure { reason, .. } => CoreError::ProbeFailure {
            path: path.to_path_buf(),
            reason,
        },
        other => CoreError::ProbeFailure {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}
