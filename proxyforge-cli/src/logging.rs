// ============================================================================
// proxyforge-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and Run-Log Dispatch
//
// Everything goes through the `log` facade. fern fans each record out to two
// sinks:
//
// - the console (stderr), level-colored, printed through the progress bars'
//   MultiProgress so log lines never tear a bar
// - an optional plain-text run log under the log directory, always at debug
//
// USAGE:
// - default console level: info
// - --verbose: debug
// - RUST_LOG=<level> overrides both (e.g. RUST_LOG=trace shows every frame update)

use crate::error::{CliErrorContext, CliResult};
use crate::progress::MULTI_PROGRESS;

use console::style;
use log::{Level, LevelFilter};

use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the run log for a run starting now.
pub fn run_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("proxyforge_run_{}.log", get_timestamp()))
}

/// Console level from `--verbose`, unless RUST_LOG names a valid level.
pub fn console_level(verbose: bool) -> LevelFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.trim().parse::<LevelFilter>().ok())
        .unwrap_or(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
}

fn level_tag(level: Level) -> String {
    match level {
        Level::Error => style("error").red().bold().to_string(),
        Level::Warn => style("warn").yellow().bold().to_string(),
        Level::Info => style("info").green().to_string(),
        Level::Debug => style("debug").blue().to_string(),
        Level::Trace => style("trace").dim().to_string(),
    }
}

/// Installs the global logger. Call once per process.
pub fn init_logging(console: LevelFilter, log_file: Option<&Path>) -> CliResult<()> {
    let console_dispatch = fern::Dispatch::new()
        .level(console)
        .format(|out, message, record| {
            out.finish(format_args!("{} {}", level_tag(record.level()), message))
        })
        .chain(fern::Output::call(|record| {
            let line = record.args().to_string();
            MULTI_PROGRESS.suspend(|| eprintln!("{line}"));
        }));

    let mut root = fern::Dispatch::new()
        .level(LevelFilter::Trace)
        .level_for("ffmpeg_sidecar", LevelFilter::Warn)
        .chain(console_dispatch);

    if let Some(path) = log_file {
        let file = fern::log_file(path)
            .cli_with_context(|| format!("Failed to open run log {}", path.display()))?;
        root = root.chain(
            fern::Dispatch::new()
                .level(LevelFilter::Debug)
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {:<5} {}] {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(file),
        );
    }

    root.apply()
        .cli_with_context(|| "Failed to install logger")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shape() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_run_log_path_lives_in_log_dir() {
        let path = run_log_path(Path::new("/proxies/logs"));
        assert_eq!(path.parent(), Some(Path::new("/proxies/logs")));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("proxyforge_run_") && name.ends_with(".log"), "{name}");
    }
}
