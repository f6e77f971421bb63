//! Input debouncing.

use std::time::Duration;

use tokio::time::Instant;

/// Quiet period after the last keystroke before a search starts.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// Holds the latest value until no newer one has arrived for `window`.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace the pending value and restart the window.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.window));
    }

    /// When the pending value becomes ready, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Take the pending value if its window has elapsed.
    pub fn take_ready(&mut self) -> Option<T> {
        match &self.pending {
            Some((_, at)) if *at <= Instant::now() => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Drop the pending value.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}
