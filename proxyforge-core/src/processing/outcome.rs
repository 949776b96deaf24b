//! Per-item outcomes and the batch summary built from them.

use std::path::PathBuf;
use std::time::Duration;

use crate::discovery::SourceItem;

/// Terminal record for one source item.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeOutcome {
    pub item: SourceItem,
    pub frames_processed: u64,
    pub succeeded: bool,
    /// Diagnostic text for failed items (encoder tail or setup error).
    pub error_detail: Option<String>,
    /// Wall time spent on the item, probe included.
    pub elapsed: Duration,
    /// Size of the written proxy, when it could be read.
    pub proxy_size: Option<u64>,
}

impl TranscodeOutcome {
    #[must_use]
    pub fn succeeded(item: SourceItem, frames_processed: u64) -> Self {
        Self {
            item,
            frames_processed,
            succeeded: true,
            error_detail: None,
            elapsed: Duration::ZERO,
            proxy_size: None,
        }
    }

    #[must_use]
    pub fn failed(item: SourceItem, frames_processed: u64, detail: impl Into<String>) -> Self {
        Self {
            item,
            frames_processed,
            succeeded: false,
            error_detail: Some(detail.into()),
            elapsed: Duration::ZERO,
            proxy_size: None,
        }
    }
}

/// One failed item in a [`BatchSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub source_path: PathBuf,
    pub detail: String,
}

/// Aggregate view of a finished batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchSummary {
    pub items_total: usize,
    pub succeeded: usize,
    pub failures: Vec<FailedItem>,
    pub frames_processed: u64,
    pub proxy_bytes: u64,
    pub elapsed: Duration,
}

impl BatchSummary {
    #[must_use]
    pub fn from_outcomes(outcomes: &[TranscodeOutcome], elapsed: Duration) -> Self {
        let mut summary = BatchSummary {
            items_total: outcomes.len(),
            elapsed,
            ..Self::default()
        };
        for outcome in outcomes {
            summary.frames_processed += outcome.frames_processed;
            if outcome.succeeded {
                summary.succeeded += 1;
                summary.proxy_bytes += outcome.proxy_size.unwrap_or(0);
            } else {
                summary.failures.push(FailedItem {
                    source_path: outcome.item.source_path().to_path_buf(),
                    detail: outcome
                        .error_detail
                        .clone()
                        .unwrap_or_else(|| "unknown error".to_string()),
                });
            }
        }
        summary
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> SourceItem {
        SourceItem::new(
            PathBuf::from(format!("/footage/day1/{name}.mov")),
            "day1",
            PathBuf::from(format!("/proxies/day1/{name}.mov")),
        )
    }

    #[test]
    fn test_summary_counts_and_failures() {
        let mut ok = TranscodeOutcome::succeeded(item("a"), 100);
        ok.proxy_size = Some(2048);
        let outcomes = vec![
            ok,
            TranscodeOutcome::failed(item("b"), 40, "ffmpeg exited with exit status: 1"),
            TranscodeOutcome::succeeded(item("c"), 50),
        ];

        let summary = BatchSummary::from_outcomes(&outcomes, Duration::from_secs(12));

        assert_eq!(summary.items_total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.frames_processed, 190);
        assert_eq!(summary.proxy_bytes, 2048);
        assert_eq!(summary.failures[0].source_path, PathBuf::from("/footage/day1/b.mov"));
        assert!(!summary.all_succeeded());
    }
}
