//! Encoder progress monitoring.
//!
//! The encoder's stderr carries `-progress` key/value blocks (`frame=123`,
//! `fps=...`, `progress=continue`) interleaved with ordinary diagnostics.
//! [`ProgressEvents`] turns that stream into a lazy, finite sequence of frame
//! updates; [`monitor_encode`] drives it for a live child process and decides
//! the item's outcome from the exit status.

use std::collections::VecDeque;
use std::fs;
use std::io::{BufRead, ErrorKind};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::discovery::SourceItem;
use crate::error::CoreError;
use crate::events::{Event, EventDispatcher};
use crate::external::{EncoderProcess, EncoderSpawner};
use crate::processing::{BatchProgress, TranscodeOutcome};

static FRAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"frame=\s*(\S+)").expect("valid frame regex"));

/// Non-progress lines kept for the failure detail.
pub const DIAGNOSTIC_TAIL_LINES: usize = 20;

/// Extracts the raw frame counter from a progress line, if it has one.
///
/// Returns `None` for lines without a counter and for counters that are not
/// integers.
#[must_use]
pub fn parse_frame_line(line: &str) -> Option<u64> {
    let caps = FRAME_RE.captures(line)?;
    caps[1].parse().ok()
}

/// Monotonic frame counter for one item.
///
/// Observed values are clamped to the known total; values that go backwards
/// are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCounter {
    frames_done: u64,
    frames_total: Option<u64>,
}

impl FrameCounter {
    #[must_use]
    pub fn new(frames_total: Option<u64>) -> Self {
        Self {
            frames_done: 0,
            frames_total,
        }
    }

    #[must_use]
    pub fn frames_done(&self) -> u64 {
        self.frames_done
    }

    #[must_use]
    pub fn frames_total(&self) -> Option<u64> {
        self.frames_total
    }

    /// Records an observed counter and returns the forward delta, if any.
    pub fn observe(&mut self, frame: u64) -> Option<u64> {
        let frame = match self.frames_total {
            Some(total) => frame.min(total),
            None => frame,
        };
        if frame <= self.frames_done {
            return None;
        }
        let delta = frame - self.frames_done;
        self.frames_done = frame;
        Some(delta)
    }

    /// Feeds one line; non-progress and malformed lines yield `None`.
    pub fn observe_line(&mut self, line: &str) -> Option<u64> {
        parse_frame_line(line).and_then(|frame| self.observe(frame))
    }

    /// Jumps to the known total after a successful exit, returning the delta.
    pub fn complete(&mut self) -> Option<u64> {
        let total = self.frames_total?;
        self.observe(total)
    }
}

/// One forward step of the frame counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameUpdate {
    pub frames_done: u64,
    pub frames_total: Option<u64>,
    pub delta: u64,
}

/// Lazy iterator of [`FrameUpdate`]s over a line-oriented progress stream.
///
/// Lines are split on `\n` and `\r`. The iterator ends at end-of-stream (or
/// on a read error, which is logged) and cannot be restarted.
pub struct ProgressEvents<R: BufRead> {
    reader: R,
    counter: FrameCounter,
    pending: VecDeque<String>,
    tail: VecDeque<String>,
    finished: bool,
}

impl<R: BufRead> ProgressEvents<R> {
    pub fn new(reader: R, frames_total: Option<u64>) -> Self {
        Self {
            reader,
            counter: FrameCounter::new(frames_total),
            pending: VecDeque::new(),
            tail: VecDeque::with_capacity(DIAGNOSTIC_TAIL_LINES),
            finished: false,
        }
    }

    /// Reads the next raw line, or `None` at end of stream.
    fn next_line(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(line);
            }
            if self.finished {
                return None;
            }
            let mut buf = Vec::new();
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    self.finished = true;
                }
                Ok(_) => {
                    let text = String::from_utf8_lossy(&buf);
                    self.pending.extend(
                        text.split(['\r', '\n'])
                            .map(str::trim)
                            .filter(|segment| !segment.is_empty())
                            .map(String::from),
                    );
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    log::warn!("Error reading encoder progress stream: {}", e);
                    self.finished = true;
                }
            }
        }
    }

    fn remember(&mut self, line: String) {
        if self.tail.len() == DIAGNOSTIC_TAIL_LINES {
            self.tail.pop_front();
        }
        self.tail.push_back(line);
    }

    /// The counter state so far.
    pub fn counter(&self) -> &FrameCounter {
        &self.counter
    }

    /// Consumes the iterator, returning the counter and the diagnostic tail.
    pub fn into_parts(self) -> (FrameCounter, Vec<String>) {
        (self.counter, self.tail.into_iter().collect())
    }
}

impl<R: BufRead> Iterator for ProgressEvents<R> {
    type Item = FrameUpdate;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(line) = self.next_line() {
            if FRAME_RE.is_match(&line) {
                if let Some(delta) = self.counter.observe_line(&line) {
                    return Some(FrameUpdate {
                        frames_done: self.counter.frames_done(),
                        frames_total: self.counter.frames_total(),
                        delta,
                    });
                }
                continue;
            }
            if !is_progress_key(&line) {
                self.remember(line);
            }
        }
        None
    }
}

/// Other `-progress` keys, which are neither frame updates nor diagnostics.
fn is_progress_key(line: &str) -> bool {
    const KEYS: &[&str] = &[
        "fps=",
        "stream_",
        "bitrate=",
        "total_size=",
        "out_time",
        "dup_frames=",
        "drop_frames=",
        "speed=",
        "progress=",
    ];
    KEYS.iter().any(|key| line.starts_with(key))
}

/// Spawns the encoder with `args`, streams its progress into `progress` and
/// `dispatcher`, and returns the item's outcome.
///
/// Never returns an error: spawn failures and non-zero exits become failed
/// outcomes so the batch can carry on.
pub fn monitor_encode<S: EncoderSpawner>(
    spawner: &S,
    args: &[String],
    item: &SourceItem,
    progress: &mut BatchProgress,
    dispatcher: &EventDispatcher,
) -> TranscodeOutcome {
    let mut child = match spawner.spawn(args) {
        Ok(child) => child,
        Err(e) => {
            log::error!("Could not start encoder for {}: {}", item.source_path().display(), e);
            return TranscodeOutcome::failed(item.clone(), 0, e.to_string());
        }
    };

    let (mut counter, tail) = match child.take_progress_stream() {
        Ok(stream) => {
            let mut events = ProgressEvents::new(stream, progress.current_item_frames_total);
            for update in &mut events {
                progress.advance_frames(update.frames_done);
                dispatcher.emit(Event::FrameProgress {
                    frames_done: update.frames_done,
                    frames_total: update.frames_total,
                });
            }
            events.into_parts()
        }
        Err(e) => {
            log::warn!("No progress stream for {}: {}", item.source_path().display(), e);
            (FrameCounter::new(progress.current_item_frames_total), Vec::new())
        }
    };

    let status = match child.wait() {
        Ok(status) => status,
        Err(e) => {
            log::error!("Lost encoder for {}: {}", item.source_path().display(), e);
            return TranscodeOutcome::failed(item.clone(), counter.frames_done(), e.to_string());
        }
    };

    if status.success() {
        if counter.complete().is_some() {
            progress.advance_frames(counter.frames_done());
            dispatcher.emit(Event::FrameProgress {
                frames_done: counter.frames_done(),
                frames_total: counter.frames_total(),
            });
        }
        log::info!(
            target: "proxyforge::progress",
            "Proxy written: {}",
            item.output_path().display()
        );
        TranscodeOutcome::succeeded(item.clone(), counter.frames_done())
    } else {
        let mut detail = format!("ffmpeg exited with {status}");
        if !tail.is_empty() {
            detail.push_str(":\n");
            detail.push_str(&tail.join("\n"));
        }
        let failure = CoreError::EncodeFailure {
            path: item.source_path().to_path_buf(),
            detail,
        };
        log::error!("{}", failure);
        cleanup_partial_output(item.output_path());
        TranscodeOutcome::failed(item.clone(), counter.frames_done(), failure.to_string())
    }
}

fn cleanup_partial_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::warn!("Removed partial output {}", path.display()),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => log::warn!("Failed to remove partial output {}: {}", path.display(), err),
    }
}
