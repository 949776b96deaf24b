//! Implementation of the 'transcode' subcommand.
//!
//! Validates the footage root, prepares the proxy and log directories, builds
//! the core configuration, discovers footage and hands the batch to
//! proxyforge-core with the progress handlers attached.

use crate::cli::TranscodeArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::progress::ProgressBarHandler;
use crate::terminal;

use proxyforge_core::events::{EventDispatcher, JsonProgressHandler, LogEventHandler};
use proxyforge_core::external::{
    SidecarSpawner, check_encoder_dependency, check_probe_dependency, prober_for,
};
use proxyforge_core::{
    BatchSummary, CoreConfig, CoreConfigBuilder, CoreError, SourceItem, find_source_items,
    process_items,
};

use log::{debug, info};

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Checks the footage root and creates the proxy root and log directory.
///
/// Returns the log directory. Runs before logging is installed so the run
/// log can be opened inside it.
pub fn prepare_directories(args: &TranscodeArgs) -> CliResult<PathBuf> {
    if !args.footage_root.is_dir() {
        return Err(CoreError::PathError(format!(
            "Footage root '{}' is not a directory",
            args.footage_root.display()
        )));
    }

    let log_dir = args
        .log_dir
        .clone()
        .unwrap_or_else(|| args.proxy_root.join("logs"));

    fs::create_dir_all(&args.proxy_root).cli_with_context(|| {
        format!("Failed to create proxy root '{}'", args.proxy_root.display())
    })?;
    fs::create_dir_all(&log_dir)
        .cli_with_context(|| format!("Failed to create log directory '{}'", log_dir.display()))?;

    Ok(log_dir)
}

/// Creates and validates CoreConfig from CLI arguments.
pub fn create_core_config(args: &TranscodeArgs, log_dir: PathBuf) -> CliResult<CoreConfig> {
    let mut builder = CoreConfigBuilder::new()
        .footage_root(args.footage_root.clone())
        .proxy_root(args.proxy_root.clone())
        .log_dir(log_dir)
        .codec_choice(args.codec)
        .probe_tool(args.probe_tool)
        .burn_overlays(!args.no_overlays);

    if let Some(width) = args.max_width {
        builder = builder.max_width(width);
    }
    if let Some(bitrate) = &args.video_bitrate {
        builder = builder.video_bitrate(bitrate.clone());
    }
    if let Some(codec) = &args.audio_codec {
        builder = builder.audio_codec(codec.clone());
    }
    if let Some(bitrate) = &args.audio_bitrate {
        builder = builder.audio_bitrate(bitrate.clone());
    }
    if let Some(extension) = &args.extension {
        builder = builder.proxy_extension(extension.trim_start_matches('.'));
    }

    builder.build()
}

/// Discovers footage; an empty tree is not an error.
fn discover(config: &CoreConfig) -> CliResult<Vec<SourceItem>> {
    match find_source_items(&config.footage_root, &config.proxy_root, &config.proxy_extension) {
        Ok(items) => Ok(items),
        Err(CoreError::NoFilesFound) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

fn build_dispatcher(json_progress: bool) -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_handler(Arc::new(LogEventHandler::new()));
    if json_progress {
        dispatcher.add_handler(Arc::new(JsonProgressHandler::new()));
    } else {
        dispatcher.add_handler(Arc::new(ProgressBarHandler::new()));
    }
    dispatcher
}

/// Runs a whole batch and prints its summary.
///
/// Returns `None` when there was no footage to transcode. Per-file failures
/// are reported in the summary, not as an error.
pub fn run_transcode(args: &TranscodeArgs, log_dir: PathBuf) -> CliResult<Option<BatchSummary>> {
    let config = create_core_config(args, log_dir)?;
    debug!("Configuration: {:?}", config);

    let items = discover(&config)?;
    if items.is_empty() {
        let notice = format!("No footage files found under {}", config.footage_root.display());
        if args.json_progress {
            // stdout carries JSON lines only.
            info!("{}", notice);
        } else {
            terminal::print_success(&notice);
        }
        return Ok(None);
    }

    check_probe_dependency(config.probe_tool)?;
    check_encoder_dependency()?;

    if !args.json_progress {
        terminal::print_section("Proxyforge");
        terminal::print_status("Footage", &config.footage_root.display().to_string(), false);
        terminal::print_status("Proxies", &config.proxy_root.display().to_string(), false);
        terminal::print_status("Codec", &config.codec_choice.to_string(), false);
        terminal::print_status("Files", &items.len().to_string(), true);
    }
    config.platform.profile().log_capabilities();
    info!("Found {} footage file(s)", items.len());

    let dispatcher = build_dispatcher(args.json_progress);
    let prober = prober_for(config.probe_tool);

    let start = Instant::now();
    let outcomes = process_items(&config, &*prober, SidecarSpawner, &items, &dispatcher);
    let summary = BatchSummary::from_outcomes(&outcomes, start.elapsed());

    if !args.json_progress {
        terminal::print_batch_summary(&outcomes, &summary);
    }
    Ok(Some(summary))
}
