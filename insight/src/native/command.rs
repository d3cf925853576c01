//! Native Mode command vocabulary.
//!
//! In-Sight sensors accept short ASCII commands over the Native Mode session.
//! Only the handful needed to select and fire an inspection program are
//! modelled here; anything else can still be sent as raw text through
//! [`DeviceSession::send_command`](super::DeviceSession::send_command).

use std::fmt;

/// File extension the sensor appends to stored job files.
pub const JOB_EXTENSION: &str = ".JOB";

/// Commands issued while running a trigger cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `GET FILELIST` - list every file stored on the sensor.
    ListFiles,
    /// `GO` - query whether the sensor is online.
    QueryOnline,
    /// `SO1` / `SO0` - request the sensor go online or offline.
    SetOnline(bool),
    /// `GF` - query the currently loaded job file.
    QueryLoadedFile,
    /// `LF<name>.JOB` - load a job file by name.
    LoadFile(String),
    /// `SW8` - fire a software trigger.
    Trigger,
}

impl Command {
    /// Wire text sent to the sensor, without the line terminator.
    pub fn wire(&self) -> String {
        match self {
            Command::ListFiles => "GET FILELIST".to_string(),
            Command::QueryOnline => "GO".to_string(),
            Command::SetOnline(true) => "SO1".to_string(),
            Command::SetOnline(false) => "SO0".to_string(),
            Command::QueryLoadedFile => "GF".to_string(),
            Command::LoadFile(name) => format!("LF{name}{JOB_EXTENSION}"),
            Command::Trigger => "SW8".to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wire())
    }
}
