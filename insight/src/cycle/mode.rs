//! Online/offline mode control.
//!
//! `SO0`/`SO1` are acknowledged immediately but the sensor changes mode some
//! time later. [`ensure_mode`](Runner::ensure_mode) therefore sends the
//! request once and polls `GO` until the new mode shows up or the mode
//! timeout runs out.
//!
//! Callers check the current mode first and only call `ensure_mode` when a
//! change is actually needed.

use strum::Display;
use tracing::info;

use super::error::{CycleError, CycleResult};
use super::poll::PollOutcome;
use super::runner::Runner;
use crate::native::{Command, DeviceSession, ONLINE_FIELD};

/// Operating mode of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DeviceMode {
    /// Inspections run; triggers are accepted.
    Online,
    /// Configuration changes such as loading a job are accepted.
    Offline,
}

impl DeviceMode {
    pub fn from_online(online: bool) -> Self {
        if online {
            DeviceMode::Online
        } else {
            DeviceMode::Offline
        }
    }

    pub fn is_online(self) -> bool {
        self == DeviceMode::Online
    }
}

impl<S: DeviceSession> Runner<S> {
    /// Query the current mode with `GO`.
    pub fn query_mode(&mut self) -> CycleResult<DeviceMode> {
        self.cancel.check()?;

        info!("Checking online status...");
        let command = Command::QueryOnline;
        let response = self.send(command.clone())?;
        let flag = response
            .field(ONLINE_FIELD)
            .ok_or_else(|| CycleError::UnexpectedResponse {
                command: command.wire(),
                field: ONLINE_FIELD,
                status: response.status_text().to_string(),
            })?;

        let mode = DeviceMode::from_online(flag == "1");
        info!("Device is {mode}.");
        Ok(mode)
    }

    /// Request `want` and wait until the sensor reports it.
    ///
    /// # Errors
    ///
    /// [`CycleError::ModeTimeout`] if `want` is not observed within the mode
    /// timeout, [`CycleError::Cancelled`] if the cancellation flag is raised.
    pub fn ensure_mode(&mut self, want: DeviceMode) -> CycleResult<()> {
        self.cancel.check()?;

        info!("Going {want}...");
        self.send(Command::SetOnline(want.is_online()))?;

        let budget = self.timing.mode_timeout;
        let outcome = self.poll_until(budget, |runner| {
            let reached = runner.query_mode()? == want;
            if !reached {
                info!("...not yet {want}...");
            }
            Ok(reached)
        })?;

        match outcome {
            PollOutcome::Success => {
                info!("...went {want}.");
                Ok(())
            }
            PollOutcome::TimedOut => Err(CycleError::ModeTimeout(want)),
            PollOutcome::Cancelled => Err(CycleError::Cancelled),
        }
    }
}
