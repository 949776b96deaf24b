//! Batch coordination and its records.
//!
//! This module drives items through probe, plan, encode and monitor, and
//! holds the counters and outcome types the rest of the crate reports on.

/// Sequential batch driver
pub mod batch;

/// Per-item outcomes and the batch summary
pub mod outcome;

/// Item and frame counters
pub mod progress;

pub use batch::{BatchCoordinator, process_items};
pub use outcome::{BatchSummary, FailedItem, TranscodeOutcome};
pub use progress::BatchProgress;
