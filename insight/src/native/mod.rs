//! Cognex In-Sight Native Mode protocol.
mod command;
mod response;
mod session;
mod telnet;

pub use command::{Command, JOB_EXTENSION};
pub use response::{
    status_message, Response, ResponseShape, FILE_NAME_FIELD, ONLINE_FIELD, STATUS_FIELD,
    STATUS_OK,
};
pub use session::{DeviceSession, SessionError, SessionResult};
pub use telnet::{NativeModeClient, DEFAULT_PORT};
