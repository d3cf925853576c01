//! Fixed timing constants for polling the sensor.

use std::time::Duration;

/// Pause between two status polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// How long a requested online/offline change may take to become visible.
pub const MODE_TIMEOUT: Duration = Duration::from_millis(5000);

/// How long a requested job load may take to become visible.
pub const SELECTION_TIMEOUT: Duration = Duration::from_millis(5000);

/// Timing carried by a [`Runner`](super::Runner).
///
/// The defaults are the tool-wide constants above. Every poll loop in a run
/// reads from the same instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub poll_interval: Duration,
    pub mode_timeout: Duration,
    pub selection_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            mode_timeout: MODE_TIMEOUT,
            selection_timeout: SELECTION_TIMEOUT,
        }
    }
}
