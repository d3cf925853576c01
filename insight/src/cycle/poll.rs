//! Bounded status polling shared by the mode controller and program selector.

use std::time::{Duration, Instant};

use super::error::CycleResult;
use super::runner::Runner;
use crate::native::DeviceSession;

/// Result of one polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The expected state was observed.
    Success,
    /// The budget ran out before the state was observed.
    TimedOut,
    /// The cancellation flag was raised.
    Cancelled,
}

impl<S: DeviceSession> Runner<S> {
    /// Repeatedly run `observe` until it reports `true`.
    ///
    /// Each iteration checks the cancellation flag, then observes. Between
    /// observations the loop sleeps the poll interval, shortened so that the
    /// last observation lands on the budget. The budget is measured from the
    /// call, so a timeout is reported no earlier than `budget` and no later
    /// than one observation after it.
    ///
    /// Errors from `observe` end the loop immediately.
    pub(crate) fn poll_until<F>(
        &mut self,
        budget: Duration,
        mut observe: F,
    ) -> CycleResult<PollOutcome>
    where
        F: FnMut(&mut Self) -> CycleResult<bool>,
    {
        let started = Instant::now();
        loop {
            if self.cancel.is_cancelled() {
                return Ok(PollOutcome::Cancelled);
            }

            if observe(self)? {
                return Ok(PollOutcome::Success);
            }

            let elapsed = started.elapsed();
            if elapsed >= budget {
                return Ok(PollOutcome::TimedOut);
            }

            let pause = self.timing.poll_interval.min(budget - elapsed);
            if self.cancel.sleep(pause) {
                return Ok(PollOutcome::Cancelled);
            }
        }
    }
}
