//! Cancellable debounce timer.
//!
//! [`DebounceTimer`] holds at most one deadline. Re-arming replaces the
//! deadline (last edit wins), and [`expired`](DebounceTimer::expired)
//! resolves once the current deadline passes. It is polled from the
//! session's `select!` loop, so it must stay cancel-safe: dropping an
//! unfinished `expired()` future leaves the deadline armed.

use std::future;
use std::time::Duration;

use tokio::time::{self, Instant};

#[derive(Debug)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)start the countdown from now.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Disarm the timer. Returns whether it was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Wait for the armed deadline, then disarm. Never resolves while the
    /// timer is disarmed.
    pub async fn expired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                time::sleep_until(deadline).await;
                self.deadline = None;
            }
            None => future::pending().await,
        }
    }
}
