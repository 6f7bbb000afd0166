//! Lazy batch cursor over one filter generation's results

use std::ops::Range;

/// Default number of entries revealed per batch
pub const DEFAULT_BATCH_SIZE: usize = 12;

/// Entries revealed by one [`LazyCursor::advance`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Entry indices newly materialized
    pub range: Range<usize>,
    /// Set on the batch that reaches the end, once per generation
    pub no_more: bool,
}

/// Count of entries already materialized for the current generation.
///
/// Monotonic within a generation; [`reset`](LazyCursor::reset) starts a new
/// generation at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyCursor {
    batch_size: usize,
    total: usize,
    position: usize,
    generation: u64,
    end_signalled: bool,
}

impl Default for LazyCursor {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl LazyCursor {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            total: 0,
            position: 0,
            generation: 0,
            end_signalled: false,
        }
    }

    /// Start a new generation over `total` entries
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.position = 0;
        self.generation += 1;
        self.end_signalled = false;
    }

    /// Reveal the next batch; `None` once every entry is materialized.
    ///
    /// The position is updated before the batch is handed out, so a trigger
    /// arriving while the caller appends the batch sees the new position.
    pub fn advance(&mut self) -> Option<Batch> {
        if self.position >= self.total {
            return None;
        }

        let start = self.position;
        let end = (start + self.batch_size).min(self.total);
        self.position = end;

        let no_more = end >= self.total && !self.end_signalled;
        if no_more {
            self.end_signalled = true;
        }

        Some(Batch {
            range: start..end,
            no_more,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.total
    }
}
