//! Progress events emitted by the batch coordinator and process monitor.
//!
//! The core never renders anything itself. Interested parties register an
//! [`EventHandler`] with an [`EventDispatcher`]; the CLI turns the events into
//! progress bars, [`LogEventHandler`] into log records and
//! [`JsonProgressHandler`] into JSON lines for other tools.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::processing::TranscodeOutcome;

pub mod json_handler;
pub mod log_handler;

pub use json_handler::JsonProgressHandler;
pub use log_handler::LogEventHandler;

#[derive(Debug, Clone)]
pub enum Event {
    BatchStarted {
        items_total: usize,
    },

    /// An item is about to be probed and encoded. `index` is 1-based.
    ItemStarted {
        index: usize,
        items_total: usize,
        source_path: PathBuf,
        output_path: PathBuf,
        frames_total: Option<u64>,
        codec: String,
    },

    /// Cumulative frames for the current item.
    FrameProgress {
        frames_done: u64,
        frames_total: Option<u64>,
    },

    ItemFinished {
        outcome: TranscodeOutcome,
    },

    BatchProgress {
        items_done: usize,
        items_total: usize,
    },

    BatchComplete {
        succeeded: usize,
        failed: usize,
        elapsed: Duration,
    },
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl EventHandler for Recorder {
        fn handle(&self, event: &Event) {
            self.0.lock().unwrap().push(format!("{event:?}"));
        }
    }

    #[test]
    fn test_dispatcher_fans_out_to_every_handler() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(first.clone());
        dispatcher.add_handler(second.clone());

        dispatcher.emit(Event::BatchStarted { items_total: 3 });

        assert_eq!(first.0.lock().unwrap().len(), 1);
        assert_eq!(second.0.lock().unwrap().len(), 1);
    }
}
