//! Cancellation and time sources for the navigation loop
//!
//! Timed waits are the controller's only motion feedback, so every blocking
//! sleep in the crate goes through [`Clock`]. That keeps the waits
//! interruptible by an external shutdown request and lets tests replace
//! real delays entirely.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::NavError;

/// A clonable shutdown flag shared between the navigation loop and its
/// caller.
///
/// Replaces signal-handler shutdown: the caller cancels the token and the
/// run unwinds through its normal safety-stop path.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown; every waiter observes this at its next checkpoint
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether shutdown has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with [`NavError::Cancelled`] once shutdown has been requested
    pub fn checkpoint(&self) -> Result<(), NavError> {
        if self.is_cancelled() {
            Err(NavError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Source of blocking delays for timed motion and loop pacing
pub trait Clock: Send + Sync {
    /// Sleep for `duration`, returning `Err(Cancelled)` as soon as the
    /// token fires
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> Result<(), NavError>;
}

/// Wall-clock implementation.
///
/// Sleeps in short slices so a cancellation fired mid-motion is observed
/// within tens of milliseconds rather than after the full hold time.
#[derive(Debug, Default)]
pub struct SystemClock;

const SLICE: Duration = Duration::from_millis(20);

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> Result<(), NavError> {
        let mut remaining = duration;
        loop {
            cancel.checkpoint()?;
            if remaining.is_zero() {
                return Ok(());
            }
            let slice = remaining.min(SLICE);
            thread::sleep(slice);
            remaining = remaining.saturating_sub(slice);
        }
    }
}
