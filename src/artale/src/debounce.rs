//! Trailing-edge debounce driven by an external clock
//!
//! The host feeds timestamps in milliseconds: [`Debouncer::trigger`] on each
//! edit and [`Debouncer::poll`] from its tick loop. Every trigger replaces
//! the pending one, so a burst of edits fires once, `delay_ms` after the last.

/// Default quiet period before a debounced recompute
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    delay_ms: u64,
    dirty_since: Option<u64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            dirty_since: None,
        }
    }

    /// Cancel any pending fire and reschedule from `now_ms`
    pub fn trigger(&mut self, now_ms: u64) {
        self.dirty_since = Some(now_ms);
    }

    /// Whether the pending fire is due at `now_ms`; consumes it if so
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.dirty_since {
            Some(since) if now_ms.saturating_sub(since) >= self.delay_ms => {
                self.dirty_since = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending fire; returns whether one was pending
    pub fn cancel(&mut self) -> bool {
        self.dirty_since.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// When the pending fire becomes due
    pub fn deadline(&self) -> Option<u64> {
        self.dirty_since.map(|since| since.saturating_add(self.delay_ms))
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}
