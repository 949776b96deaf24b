//! Process-wide batch counters.

/// Item and frame counters for the running batch.
///
/// Owned by the coordinator and lent to the process monitor for the duration
/// of one item. Frame counters reset only at [`BatchProgress::start_item`] and
/// never decrease within an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchProgress {
    pub items_total: usize,
    pub items_completed: usize,
    pub current_item_frames_total: Option<u64>,
    pub current_item_frames_done: u64,
}

impl BatchProgress {
    #[must_use]
    pub fn new(items_total: usize) -> Self {
        Self {
            items_total,
            ..Self::default()
        }
    }

    /// Resets the frame counters for the next item.
    pub fn start_item(&mut self, frames_total: Option<u64>) {
        self.current_item_frames_total = frames_total;
        self.current_item_frames_done = 0;
    }

    /// Moves the item's frame counter forward to `frames_done`.
    ///
    /// Smaller values are ignored; larger values are clamped to the known total.
    pub fn advance_frames(&mut self, frames_done: u64) {
        let frames_done = match self.current_item_frames_total {
            Some(total) => frames_done.min(total),
            None => frames_done,
        };
        if frames_done > self.current_item_frames_done {
            self.current_item_frames_done = frames_done;
        }
    }

    /// Counts the current item as done, whatever its outcome.
    pub fn finish_item(&mut self) {
        self.items_completed = (self.items_completed + 1).min(self.items_total);
    }

    /// Fraction of the current item encoded, when the total is known.
    #[must_use]
    pub fn item_fraction(&self) -> Option<f64> {
        match self.current_item_frames_total {
            Some(0) | None => None,
            Some(total) => Some(self.current_item_frames_done as f64 / total as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_never_decrease_or_overshoot() {
        let mut progress = BatchProgress::new(2);
        progress.start_item(Some(100));
        progress.advance_frames(40);
        progress.advance_frames(30);
        assert_eq!(progress.current_item_frames_done, 40);
        progress.advance_frames(150);
        assert_eq!(progress.current_item_frames_done, 100);
        assert_eq!(progress.item_fraction(), Some(1.0));
    }

    #[test]
    fn test_start_item_resets_frames() {
        let mut progress = BatchProgress::new(2);
        progress.start_item(Some(10));
        progress.advance_frames(10);
        progress.finish_item();
        progress.start_item(None);
        assert_eq!(progress.current_item_frames_done, 0);
        assert_eq!(progress.item_fraction(), None);
        assert_eq!(progress.items_completed, 1);
    }
}
