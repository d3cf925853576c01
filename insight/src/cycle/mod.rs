//! Check, select and trigger an inspection program.
//!
//! A cycle runs three steps against one [`DeviceSession`](crate::native::DeviceSession):
//!
//! 1. [`ensure_program_exists`](Runner::ensure_program_exists) - the job is stored on the sensor
//! 2. [`select_program`](Runner::select_program) - the job is loaded, offline if needed
//! 3. [`trigger`](Runner::trigger) - the sensor is online and `SW8` is acknowledged
//!
//! Mode and job changes are eventually consistent on the sensor, so steps 2
//! and 3 poll for the new state within fixed budgets (see [`Timing`]).
mod cancel;
mod error;
mod mode;
mod poll;
mod program;
mod runner;
mod selector;
mod timing;
mod trigger;

#[cfg(test)]
pub(crate) mod testing;

pub use cancel::CancellationFlag;
pub use error::{CycleError, CycleResult, FailureKind};
pub use mode::DeviceMode;
pub use poll::PollOutcome;
pub use program::{normalize, ProgramCatalog, ProgramName};
pub use runner::Runner;
pub use timing::{Timing, MODE_TIMEOUT, POLL_INTERVAL, SELECTION_TIMEOUT};
pub use trigger::TRIGGER_ACK;
