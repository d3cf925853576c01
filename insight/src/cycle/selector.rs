//! Program (job) selection.

use tracing::info;

use super::error::{CycleError, CycleResult};
use super::mode::DeviceMode;
use super::poll::PollOutcome;
use super::program::ProgramName;
use super::runner::Runner;
use crate::native::{Command, DeviceSession, FILE_NAME_FIELD};

impl<S: DeviceSession> Runner<S> {
    /// Query the currently loaded job with `GF`.
    pub fn loaded_program(&mut self) -> CycleResult<ProgramName> {
        self.cancel.check()?;

        let command = Command::QueryLoadedFile;
        let response = self.send(command.clone())?;
        response
            .field(FILE_NAME_FIELD)
            .map(ProgramName::new)
            .ok_or_else(|| CycleError::UnexpectedResponse {
                command: command.wire(),
                field: FILE_NAME_FIELD,
                status: response.status_text().to_string(),
            })
    }

    /// Make `target` the loaded job.
    ///
    /// Does nothing if it is already loaded. Otherwise takes the sensor
    /// offline (jobs cannot be loaded while online), sends a single load
    /// command and polls `GF` until the job shows up. The load command is
    /// never repeated.
    pub fn select_program(&mut self, target: &ProgramName) -> CycleResult<()> {
        self.cancel.check()?;

        info!("Selecting program {target}...");
        if self.loaded_program()? == *target {
            info!("Program already selected.");
            return Ok(());
        }

        if self.query_mode()? == DeviceMode::Online {
            self.ensure_mode(DeviceMode::Offline)?;
        }

        self.cancel.check()?;
        self.send(Command::LoadFile(target.as_str().to_string()))?;

        let budget = self.timing.selection_timeout;
        let outcome = self.poll_until(budget, |runner| {
            let selected = runner.loaded_program()? == *target;
            if !selected {
                info!("...program not selected yet...");
            }
            Ok(selected)
        })?;

        match outcome {
            PollOutcome::Success => {
                info!("...program selected.");
                Ok(())
            }
            PollOutcome::TimedOut => Err(CycleError::SelectionTimeout(target.clone())),
            PollOutcome::Cancelled => Err(CycleError::Cancelled),
        }
    }
}
