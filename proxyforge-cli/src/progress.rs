// ============================================================================
// proxyforge-cli/src/progress.rs
// ============================================================================
//
// PROGRESS BARS: Terminal Rendering of Core Progress Events
//
// Two bars stacked in one MultiProgress:
// - batch bar: items completed out of items discovered
// - item bar: frames encoded for the current file, or a spinner with a raw
//   frame counter when the probe could not supply a total
//
// The core emits events from the single encode thread; the handler only holds
// its lock long enough to update a bar.

use proxyforge_core::events::{Event, EventHandler};
use proxyforge_core::utils::format_frames;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

use std::sync::Mutex;
use std::time::Duration;

/// Shared by the bars and the console logger.
pub static MULTI_PROGRESS: Lazy<MultiProgress> = Lazy::new(MultiProgress::new);

const TICK: Duration = Duration::from_millis(100);

fn batch_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} files ({elapsed_precise})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ")
}

fn item_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {percent}% {pos}/{len} frames ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg} {pos} frames ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

#[derive(Default)]
struct Bars {
    batch: Option<ProgressBar>,
    item: Option<ProgressBar>,
}

/// Renders batch and per-file progress with indicatif.
#[derive(Default)]
pub struct ProgressBarHandler {
    bars: Mutex<Bars>,
}

impl ProgressBarHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for ProgressBarHandler {
    fn handle(&self, event: &Event) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };

        match event {
            Event::BatchStarted { items_total } => {
                let bar = MULTI_PROGRESS.add(ProgressBar::new(*items_total as u64));
                bar.set_style(batch_style());
                bar.set_prefix("Batch");
                bars.batch = Some(bar);
            }
            Event::ItemStarted {
                index,
                items_total,
                source_path,
                frames_total,
                ..
            } => {
                if let Some(previous) = bars.item.take() {
                    previous.finish_and_clear();
                }
                let bar = match frames_total {
                    Some(total) => ProgressBar::new(*total).with_style(item_style()),
                    None => ProgressBar::new_spinner().with_style(spinner_style()),
                };
                let bar = MULTI_PROGRESS.add(bar);
                let name = source_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                bar.set_message(format!("[{index}/{items_total}] {name}"));
                bar.enable_steady_tick(TICK);
                bars.item = Some(bar);
            }
            Event::FrameProgress { frames_done, .. } => {
                if let Some(bar) = &bars.item {
                    bar.set_position(*frames_done);
                }
            }
            Event::ItemFinished { outcome } => {
                if let Some(bar) = bars.item.take() {
                    if outcome.succeeded {
                        bar.finish_and_clear();
                    } else {
                        bar.abandon_with_message(format!(
                            "{} failed at {}",
                            outcome.item.file_name(),
                            format_frames(outcome.frames_processed, bar.length())
                        ));
                    }
                }
            }
            Event::BatchProgress { items_done, .. } => {
                if let Some(bar) = &bars.batch {
                    bar.set_position(*items_done as u64);
                }
            }
            Event::BatchComplete { .. } => {
                if let Some(bar) = bars.batch.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }
}
