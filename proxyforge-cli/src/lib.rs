// proxyforge-cli/src/lib.rs
//
// Library portion of the Proxyforge CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod progress;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ProbeArgs, TranscodeArgs};
pub use commands::{prepare_directories, run_probe, run_transcode};
pub use error::CliResult;
