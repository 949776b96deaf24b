// ============================================================================
// proxyforge-core/src/processing/batch.rs
// ============================================================================
//
// BATCH COORDINATION: Sequential Proxy Transcoding
//
// Drives every discovered item through the same pipeline, strictly one at a
// time:
//
// 1. Probe the source (failure degrades to unknown metadata)
// 2. Derive the encode plan and build the ffmpeg arguments
// 3. Create the proxy's parent directory
// 4. Run and monitor the encoder
// 5. Record the outcome and advance the batch counters
//
// A failure on one item never stops the batch: it becomes a failed
// TranscodeOutcome and the coordinator moves on.

use crate::config::CoreConfig;
use crate::discovery::SourceItem;
use crate::encoding::{CommandBuilder, EncodePlan, monitor_encode};
use crate::events::{Event, EventDispatcher};
use crate::external::{EncoderSpawner, ProbeExecutor};
use crate::media::extract_or_unknown;

use super::outcome::TranscodeOutcome;
use super::progress::BatchProgress;

use log::{debug, error};

use std::fs;
use std::time::Instant;

/// Runs items sequentially and owns the batch counters.
pub struct BatchCoordinator<'a, P: ProbeExecutor, S: EncoderSpawner> {
    config: &'a CoreConfig,
    prober: P,
    spawner: S,
    dispatcher: &'a EventDispatcher,
    command_builder: CommandBuilder,
    progress: BatchProgress,
}

impl<'a, P: ProbeExecutor, S: EncoderSpawner> BatchCoordinator<'a, P, S> {
    pub fn new(
        config: &'a CoreConfig,
        prober: P,
        spawner: S,
        dispatcher: &'a EventDispatcher,
    ) -> Self {
        Self {
            config,
            prober,
            spawner,
            dispatcher,
            command_builder: CommandBuilder::from_config(config),
            progress: BatchProgress::default(),
        }
    }

    /// Counters as of the last processed item.
    pub fn progress(&self) -> &BatchProgress {
        &self.progress
    }

    /// Processes `items` in order, returning one outcome per item.
    pub fn run(&mut self, items: &[SourceItem]) -> Vec<TranscodeOutcome> {
        let batch_start = Instant::now();
        self.progress = BatchProgress::new(items.len());
        self.dispatcher.emit(Event::BatchStarted {
            items_total: items.len(),
        });

        let mut outcomes = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let outcome = self.process_item(index + 1, item);

            self.progress.finish_item();
            self.dispatcher.emit(Event::ItemFinished {
                outcome: outcome.clone(),
            });
            self.dispatcher.emit(Event::BatchProgress {
                items_done: self.progress.items_completed,
                items_total: self.progress.items_total,
            });
            outcomes.push(outcome);
        }

        let succeeded = outcomes.iter().filter(|o| o.succeeded).count();
        self.dispatcher.emit(Event::BatchComplete {
            succeeded,
            failed: outcomes.len() - succeeded,
            elapsed: batch_start.elapsed(),
        });
        outcomes
    }

    fn process_item(&mut self, index: usize, item: &SourceItem) -> TranscodeOutcome {
        let item_start = Instant::now();

        let metadata = extract_or_unknown(&self.prober, item.source_path());
        self.progress.start_item(metadata.total_frames);

        // Fresh plan per item, never reused.
        let plan = EncodePlan::derive(self.config, item, &metadata);
        let args = self.command_builder.build(item, &plan);
        debug!("Plan for {}: {:?}", item.file_name(), plan);

        self.dispatcher.emit(Event::ItemStarted {
            index,
            items_total: self.progress.items_total,
            source_path: item.source_path().to_path_buf(),
            output_path: item.output_path().to_path_buf(),
            frames_total: metadata.total_frames,
            codec: format!("{} ({})", plan.codec, plan.codec_id),
        });

        let mut outcome = match ensure_parent_dir(item) {
            Ok(()) => monitor_encode(
                &self.spawner,
                &args,
                item,
                &mut self.progress,
                self.dispatcher,
            ),
            Err(e) => {
                error!("{}", e);
                TranscodeOutcome::failed(item.clone(), 0, e)
            }
        };

        outcome.elapsed = item_start.elapsed();
        if outcome.succeeded {
            outcome.proxy_size = fs::metadata(item.output_path()).ok().map(|m| m.len());
        }
        outcome
    }
}

fn ensure_parent_dir(item: &SourceItem) -> Result<(), String> {
    match item.output_path().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| {
                format!("Failed to create output directory {}: {}", parent.display(), e)
            })
        }
        _ => Ok(()),
    }
}

/// Processes `items` with a fresh [`BatchCoordinator`].
///
/// Returns one [`TranscodeOutcome`] per item, in the order given. The
/// function itself cannot fail: per-item problems are recorded in the
/// outcomes.
///
/// # Examples
///
/// ```rust,no_run
/// use proxyforge_core::events::EventDispatcher;
/// use proxyforge_core::external::{MediaInfoExecutor, SidecarSpawner};
/// use proxyforge_core::{CoreConfig, find_source_items, process_items};
/// use std::path::PathBuf;
///
/// let config = CoreConfig::new(
///     PathBuf::from("/footage"),
///     PathBuf::from("/proxies"),
///     PathBuf::from("/proxies/logs"),
/// );
/// let items = find_source_items(&config.footage_root, &config.proxy_root, &config.proxy_extension)?;
/// let outcomes = process_items(
///     &config,
///     MediaInfoExecutor::new(),
///     SidecarSpawner,
///     &items,
///     &EventDispatcher::new(),
/// );
/// println!("{} item(s) processed", outcomes.len());
/// # Ok::<(), proxyforge_core::CoreError>(())
/// ```
pub fn process_items<P: ProbeExecutor, S: EncoderSpawner>(
    config: &CoreConfig,
    prober: P,
    spawner: S,
    items: &[SourceItem],
    dispatcher: &EventDispatcher,
) -> Vec<TranscodeOutcome> {
    BatchCoordinator::new(config, prober, spawner, dispatcher).run(items)
}
