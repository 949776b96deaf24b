//! Writes events through the `log` facade.

use super::{Event, EventHandler};

/// Logs item and batch milestones at `info`, frame progress at `trace`.
#[derive(Debug, Default)]
pub struct LogEventHandler;

impl LogEventHandler {
    pub fn new() -> Self {
        Self
    }
}

impl EventHandler for LogEventHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::BatchStarted { items_total } => {
                log::info!("Starting batch of {} file(s)", items_total);
            }
            Event::ItemStarted {
                index,
                items_total,
                source_path,
                output_path,
                frames_total,
                codec,
            } => {
                log::info!(
                    "[{}/{}] {} -> {} ({})",
                    index,
                    items_total,
                    source_path.display(),
                    output_path.display(),
                    codec
                );
                match frames_total {
                    Some(total) => log::debug!("Expecting {} frames", total),
                    None => log::debug!("Frame count unknown; progress is indeterminate"),
                }
            }
            Event::FrameProgress {
                frames_done,
                frames_total,
            } => match frames_total {
                Some(total) => log::trace!("Frames {}/{}", frames_done, total),
                None => log::trace!("Frames {}", frames_done),
            },
            Event::ItemFinished { outcome } => {
                if outcome.succeeded {
                    log::info!(
                        "Finished {} ({} frames)",
                        outcome.item.file_name(),
                        outcome.frames_processed
                    );
                } else {
                    log::error!(
                        "Failed {}: {}",
                        outcome.item.source_path().display(),
                        outcome.error_detail.as_deref().unwrap_or("unknown error")
                    );
                }
            }
            Event::BatchProgress {
                items_done,
                items_total,
            } => {
                log::debug!("Batch progress: {}/{}", items_done, items_total);
            }
            Event::BatchComplete {
                succeeded,
                failed,
                elapsed,
            } => {
                log::info!(
                    "Batch complete: {} succeeded, {} failed in {}",
                    succeeded,
                    failed,
                    crate::utils::format_duration(elapsed.as_secs_f64())
                );
            }
        }
    }
}
