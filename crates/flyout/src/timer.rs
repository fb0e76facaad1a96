//! Frame-advanced delay timers
//!
//! `DelayTimer` replaces `setTimeout`/`clearTimeout` pairs: starting a timer
//! that is already pending restarts it, so at most one firing of each kind is
//! ever outstanding.

use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct DelayTimer {
    remaining: Option<Duration>,
}

impl DelayTimer {
    pub const fn new() -> Self {
        Self { remaining: None }
    }

    /// Start (or restart) the timer
    pub fn start(&mut self, delay: Duration) {
        self.remaining = Some(delay);
    }

    /// Cancel a pending firing. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.remaining.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    /// Advance by `dt`; returns `true` exactly once, on the frame the delay elapses
    pub fn advance(&mut self, dt: Duration) -> bool {
        match self.remaining {
            Some(remaining) if remaining <= dt => {
                self.remaining = None;
                true
            }
            Some(remaining) => {
                self.remaining = Some(remaining - dt);
                false
            }
            None => false,
        }
    }
}
