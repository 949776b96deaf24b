//! Machine-readable progress: one JSON object per line.
//!
//! Lets other tools (editing-suite watchers, CI jobs) follow a batch without
//! scraping terminal output. Every object carries a `type` tag and a Unix
//! `timestamp` in seconds.

use super::{Event, EventHandler};
use serde_json::{Map, Value, json};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Frame progress is only written when the percentage crosses this step.
const PERCENT_STEP: u64 = 5;

/// Writes [`Event`]s as JSON lines.
pub struct JsonProgressHandler {
    sink: Mutex<Box<dyn Write + Send>>,
    last_step: Mutex<Option<u64>>,
}

impl JsonProgressHandler {
    /// Writes to stdout.
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(writer),
            last_step: Mutex::new(None),
        }
    }

    /// Tags `fields` with `kind` and the current time and writes one line.
    fn emit(&self, kind: &str, fields: Value) {
        let mut object = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        object.insert("type".to_string(), Value::from(kind));
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        object.insert("timestamp".to_string(), Value::from(now));

        let Ok(line) = serde_json::to_string(&Value::Object(object)) else {
            return;
        };
        if let Ok(mut sink) = self.sink.lock() {
            // Write errors are never fatal to the batch.
            if writeln!(sink, "{line}").and_then(|()| sink.flush()).is_err() {
                log::debug!("Dropped JSON progress line");
            }
        }
    }

    /// True when `percent` lands on a step not yet written for this item.
    fn is_new_step(&self, percent: u64) -> bool {
        let step = percent / PERCENT_STEP;
        let Ok(mut last) = self.last_step.lock() else {
            return true;
        };
        if *last == Some(step) {
            return false;
        }
        *last = Some(step);
        true
    }
}

impl EventHandler for JsonProgressHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::BatchStarted { items_total } => {
                self.emit("batch_started", json!({ "items_total": items_total }));
            }
            Event::ItemStarted {
                index,
                items_total,
                source_path,
                output_path,
                frames_total,
                codec,
            } => {
                if let Ok(mut last) = self.last_step.lock() {
                    *last = None;
                }
                self.emit(
                    "item_started",
                    json!({
                        "index": index,
                        "items_total": items_total,
                        "source": source_path.display().to_string(),
                        "output": output_path.display().to_string(),
                        "frames_total": frames_total,
                        "codec": codec,
                    }),
                );
            }
            Event::FrameProgress {
                frames_done,
                frames_total,
            } => {
                // Without a total there is no percentage to throttle on.
                let Some(total) = frames_total.filter(|t| *t > 0) else {
                    return;
                };
                let percent = frames_done.saturating_mul(100) / total;
                if self.is_new_step(percent) {
                    self.emit(
                        "frame_progress",
                        json!({
                            "frames_done": frames_done,
                            "frames_total": total,
                            "percent": percent,
                        }),
                    );
                }
            }
            Event::ItemFinished { outcome } => {
                self.emit(
                    "item_finished",
                    json!({
                        "source": outcome.item.source_path().display().to_string(),
                        "succeeded": outcome.succeeded,
                        "frames_processed": outcome.frames_processed,
                        "error": outcome.error_detail,
                    }),
                );
            }
            Event::BatchProgress {
                items_done,
                items_total,
            } => {
                self.emit(
                    "batch_progress",
                    json!({ "items_done": items_done, "items_total": items_total }),
                );
            }
            Event::BatchComplete {
                succeeded,
                failed,
                elapsed,
            } => {
                self.emit(
                    "batch_complete",
                    json!({
                        "succeeded": succeeded,
                        "failed": failed,
                        "duration_seconds": elapsed.as_secs(),
                    }),
                );
            }
        }
    }
}

impl Default for JsonProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
