//! Failure kinds reported for a trigger cycle.

use strum::{Display, IntoStaticStr};
use thiserror::Error;

use super::mode::DeviceMode;
use super::program::ProgramName;
use crate::native::SessionError;

/// Stable marker printed for each failed cycle.
///
/// Scripts driving the tool match on these strings, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum FailureKind {
    #[strum(serialize = "ERR_CONNECTION_FAILURE")]
    ConnectionFailure,
    #[strum(serialize = "ERR_COMMAND_FAILED")]
    CommandFailed,
    #[strum(serialize = "ERR_PROGRAM_NOT_FOUND")]
    ProgramNotFound,
    #[strum(serialize = "ERR_TOGGLE_ONLINE_FAILED")]
    ModeTimeout,
    #[strum(serialize = "ERR_PROGRAM_SELECTION_FAILED")]
    SelectionTimeout,
    #[strum(serialize = "ERR_TRIGGER_FAILED")]
    TriggerFailed,
    #[strum(serialize = "ERR_EXCEPTION")]
    UnexpectedResponse,
    #[strum(serialize = "ERR_CANCELLED")]
    Cancelled,
}

/// Why a cycle (or the session bootstrap) failed.
#[derive(Error, Debug)]
pub enum CycleError {
    /// The session could not be established.
    #[error("Failed to connect: {0}")]
    ConnectionFailure(#[source] SessionError),

    /// A command could not be sent or its reply could not be read.
    #[error("Command failed: {command}: {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: SessionError,
    },

    #[error("Program not found: {0}")]
    ProgramNotFound(ProgramName),

    /// The requested mode was not observed within the mode timeout.
    #[error("Device did not go {0} in time")]
    ModeTimeout(DeviceMode),

    /// The requested program was not observed as loaded within the timeout.
    #[error("Program {0} was not selected in time")]
    SelectionTimeout(ProgramName),

    /// The trigger acknowledgement was not the success marker.
    #[error("Trigger not acknowledged (got {0:?})")]
    TriggerFailed(String),

    /// A reply was missing a field the cycle depends on.
    #[error("Unexpected response to {command}: missing {field} (status {status:?})")]
    UnexpectedResponse {
        command: String,
        field: &'static str,
        status: String,
    },

    #[error("Cancelled")]
    Cancelled,
}

impl CycleError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CycleError::ConnectionFailure(_) => FailureKind::ConnectionFailure,
            CycleError::CommandFailed { .. } => FailureKind::CommandFailed,
            CycleError::ProgramNotFound(_) => FailureKind::ProgramNotFound,
            CycleError::ModeTimeout(_) => FailureKind::ModeTimeout,
            CycleError::SelectionTimeout(_) => FailureKind::SelectionTimeout,
            CycleError::TriggerFailed(_) => FailureKind::TriggerFailed,
            CycleError::UnexpectedResponse { .. } => FailureKind::UnexpectedResponse,
            CycleError::Cancelled => FailureKind::Cancelled,
        }
    }

    /// Stable marker string, e.g. `ERR_TRIGGER_FAILED`.
    pub fn marker(&self) -> &'static str {
        self.kind().into()
    }
}

/// Result type for cycle operations.
pub type CycleResult<T> = Result<T, CycleError>;
