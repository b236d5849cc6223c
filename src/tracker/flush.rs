//! Debounced persistence scheduling
//!
//! Scroll events arrive in bursts; only the final running maximum needs to be
//! durable. Instead of ad hoc timers, the pending flush is an explicit state
//! machine: a new event while a flush is scheduled replaces the deadline, so
//! writes never stack or overlap.

use chrono::{DateTime, Duration, Utc};

/// Default coalescing window for burst events
pub const DEFAULT_DEBOUNCE_MS: i64 = 1000;

/// State of the pending snapshot flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushState {
    /// Nothing to write
    Idle,
    /// A write is due at the contained deadline
    Scheduled(DateTime<Utc>),
    /// A write is in progress; new events re-schedule rather than re-enter
    Flushing,
}

/// Debounce controller for snapshot persistence
#[derive(Debug, Clone)]
pub struct FlushDebounce {
    state: FlushState,
    window: Duration,
}

impl Default for FlushDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl FlushDebounce {
    pub fn new(window_ms: i64) -> Self {
        Self {
            state: FlushState::Idle,
            window: Duration::milliseconds(window_ms),
        }
    }

    /// Record activity that should eventually be persisted.
    ///
    /// In `Idle` or `Scheduled` the deadline becomes `now + window`; the
    /// previous deadline, if any, is cancelled. In `Flushing` the deadline is
    /// scheduled as well, so activity during a write is not lost.
    pub fn mark(&mut self, now: DateTime<Utc>) {
        self.state = FlushState::Scheduled(now + self.window);
    }

    /// Returns true when a scheduled flush has come due, transitioning to
    /// `Flushing`. The caller performs the write and then calls `complete`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            FlushState::Scheduled(deadline) if now >= deadline => {
                self.state = FlushState::Flushing;
                true
            }
            _ => false,
        }
    }

    /// Mark the in-progress write as finished.
    pub fn complete(&mut self) {
        if self.state == FlushState::Flushing {
            self.state = FlushState::Idle;
        }
    }

    pub fn state(&self) -> FlushState {
        self.state
    }
}
