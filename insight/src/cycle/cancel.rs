//! Process-wide cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::error::{CycleError, CycleResult};

/// Longest uninterrupted sleep while waiting on the flag.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// Set-once flag observed at every step and poll of a cycle.
///
/// Clones share the same flag. Once [`cancel`](Self::cancel) has been called
/// the flag stays set for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Safe to call from a signal handler thread.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail with [`CycleError::Cancelled`] once the flag is raised.
    pub fn check(&self) -> CycleResult<()> {
        if self.is_cancelled() {
            Err(CycleError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Block for `duration` or until the flag is raised.
    ///
    /// Returns `true` if the wait ended because of cancellation.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            std::thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }

    /// Raise the flag on Ctrl-C instead of terminating the process.
    pub fn install_interrupt_handler(&self) -> Result<(), ctrlc::Error> {
        let flag = self.clone();
        ctrlc::set_handler(move || flag.cancel())
    }
}
