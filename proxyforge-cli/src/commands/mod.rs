//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// The `transcode` command: discover footage, encode every file, summarize.
pub mod transcode;

/// The `probe` command: show the metadata and codec a single file would get.
pub mod probe;

pub use probe::run_probe;
pub use transcode::{prepare_directories, run_transcode};
