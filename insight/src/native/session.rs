//! Device session abstraction.
//!
//! The trigger cycle only needs to send commands and read back structured
//! responses. Keeping that behind a trait lets the cycle run against the real
//! Telnet client or an in-memory device in tests.

use thiserror::Error;

use super::response::Response;

/// Errors raised by a device session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Low-level I/O error (socket read/write failure).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TCP connect or login handshake failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// No complete response within the configured timeout.
    #[error("Timeout waiting for response")]
    Timeout,

    /// The sensor closed the connection.
    #[error("Connection closed by device")]
    Closed,

    /// A command was issued on a session that is not connected.
    #[error("Session is not connected")]
    NotConnected,

    /// Reply did not follow the Native Mode framing.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// An exclusively owned, connected session with a vision sensor.
pub trait DeviceSession {
    /// Send a command verbatim and return the decoded reply.
    fn send_command(&mut self, command: &str) -> SessionResult<Response>;

    /// Close the session. Calling this on a closed session is a no-op.
    fn disconnect(&mut self) -> SessionResult<()>;

    /// Whether the session can still carry commands.
    fn is_connected(&self) -> bool;
}
