// proxyforge-cli/src/main.rs
//
// Entry point for the proxyforge binary.
//
// Responsibilities include:
// - Parsing command-line arguments with clap.
// - Preparing the proxy and log directories before logging starts, so the run
//   log can live inside the log directory.
// - Installing console and file logging.
// - Dispatching to the transcode or probe command.
// - Mapping the result to an exit code: 1 on a fatal error or when any file
//   failed to transcode, 0 otherwise (including an empty footage tree).

use clap::Parser;
use proxyforge_cli::{Cli, CliResult, Commands, logging, terminal};
use proxyforge_cli::{prepare_directories, run_probe, run_transcode};
use proxyforge_core::CoreError;

use std::process;

/// Runs the parsed command. `Ok(false)` means the batch ran but some file failed.
fn run(cli: Cli) -> CliResult<bool> {
    let console_level = logging::console_level(cli.verbose);

    match cli.command {
        Commands::Transcode(args) => {
            let log_dir = prepare_directories(&args)?;
            let log_path = logging::run_log_path(&log_dir);
            logging::init_logging(console_level, Some(&log_path))?;

            log::debug!("Run log: {}", log_path.display());
            log::debug!("Run started: {}", chrono::Local::now());

            let summary = run_transcode(&args, log_dir)?;

            log::debug!("Run finished: {}", chrono::Local::now());
            Ok(summary.is_none_or(|s| s.all_succeeded()))
        }
        Commands::Probe(args) => {
            logging::init_logging(console_level, None)?;
            run_probe(&args)?;
            Ok(true)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            let suggestion = match &e {
                CoreError::DependencyNotFound(_) => Some("Install it and make sure it is on PATH"),
                _ => None,
            };
            terminal::print_error("Proxyforge failed", &e.to_string(), suggestion);
            process::exit(1);
        }
    }
}
