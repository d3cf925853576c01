//! Software trigger.

use tracing::info;

use super::error::{CycleError, CycleResult};
use super::mode::DeviceMode;
use super::runner::Runner;
use crate::native::{Command, DeviceSession};

/// Acknowledgement the sensor returns for an accepted trigger.
pub const TRIGGER_ACK: &str = "1";

impl<S: DeviceSession> Runner<S> {
    /// Bring the sensor online if needed and fire `SW8`.
    ///
    /// The acknowledgement is synchronous; anything other than
    /// [`TRIGGER_ACK`] is a [`CycleError::TriggerFailed`].
    pub fn trigger(&mut self) -> CycleResult<()> {
        self.cancel.check()?;

        info!("Triggering...");
        if self.query_mode()? == DeviceMode::Offline {
            self.ensure_mode(DeviceMode::Online)?;
        }

        self.cancel.check()?;
        let response = self.send(Command::Trigger)?;
        let ack = response.text();
        let ack = ack.trim();
        if ack != TRIGGER_ACK {
            return Err(CycleError::TriggerFailed(ack.to_string()));
        }

        info!("Triggered.");
        Ok(())
    }
}
