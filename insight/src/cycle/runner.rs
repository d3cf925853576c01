//! Run context and the check/select/trigger cycle loop.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::cancel::CancellationFlag;
use super::error::{CycleError, CycleResult};
use super::program::ProgramName;
use super::timing::Timing;
use crate::native::{Command, DeviceSession, Response};

/// Owns the device session for the lifetime of a run.
///
/// Every step of a cycle checks the cancellation flag before talking to the
/// sensor, and all exchanges are strictly sequential.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use insight::cycle::{CancellationFlag, ProgramName, Runner, Timing};
/// use insight::native::NativeModeClient;
///
/// let session = NativeModeClient::connect_host("10.0.0.151", 23, "admin", "")?;
/// let mut runner = Runner::new(session, CancellationFlag::new(), Timing::default());
/// let result = runner.run(&ProgramName::new("WALKNER-IPT-VISION"), Duration::ZERO, |_| {});
/// runner.shutdown();
/// result?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Runner<S: DeviceSession> {
    session: S,
    pub(crate) cancel: CancellationFlag,
    pub(crate) timing: Timing,
}

impl<S: DeviceSession> Runner<S> {
    pub fn new(session: S, cancel: CancellationFlag, timing: Timing) -> Self {
        Self {
            session,
            cancel,
            timing,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancel
    }

    /// Send one command, mapping transport errors to
    /// [`CycleError::CommandFailed`].
    pub(crate) fn send(&mut self, command: Command) -> CycleResult<Response> {
        let text = command.wire();
        self.session.send_command(&text).map_err(|source| {
            warn!("Command failed: {text}: {source}");
            CycleError::CommandFailed {
                command: text.clone(),
                source,
            }
        })
    }

    /// Run one check, select, trigger cycle.
    ///
    /// If the cancellation flag is raised by the time the cycle fails, the
    /// failure is reported as [`CycleError::Cancelled`].
    pub fn run_once(&mut self, target: &ProgramName) -> CycleResult<()> {
        let result = self
            .ensure_program_exists(target)
            .and_then(|()| self.select_program(target))
            .and_then(|()| self.trigger());

        match result {
            Err(_) if self.cancel.is_cancelled() => Err(CycleError::Cancelled),
            other => other,
        }
    }

    /// Run cycles for `target`.
    ///
    /// With a zero `repeat` a single cycle runs and its failure is returned.
    /// Otherwise cycles repeat with `repeat` between them until cancelled;
    /// each failure is handed to `report` and the loop carries on.
    pub fn run<F>(
        &mut self,
        target: &ProgramName,
        repeat: Duration,
        mut report: F,
    ) -> CycleResult<()>
    where
        F: FnMut(&CycleError),
    {
        if repeat.is_zero() {
            return self.run_once(target);
        }

        let mut cycle: u64 = 0;
        while !self.cancel.is_cancelled() {
            cycle += 1;
            debug!("Starting cycle {cycle}");

            match self.run_once(target) {
                Ok(()) => info!("Cycle {cycle} complete."),
                Err(e) => {
                    warn!("Cycle {cycle} failed: {e}");
                    report(&e);
                }
            }

            if self.cancel.sleep(repeat) {
                break;
            }
        }

        info!("Stopped after {cycle} cycles.");
        Ok(())
    }

    /// Close the session if it is still open.
    ///
    /// Best effort: a failure to disconnect is logged and otherwise ignored
    /// so it never replaces the outcome of the run.
    pub fn shutdown(&mut self) {
        if !self.session.is_connected() {
            return;
        }

        info!("Closing the connection...");
        if let Err(e) = self.session.disconnect() {
            warn!("Failed to close the connection: {e}");
        }
    }
}
