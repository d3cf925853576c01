//! In-Sight Native Mode client over Telnet.
//!
//! In-Sight sensors expose Native Mode on the Telnet port (23 by default).
//! A session starts with a login dialogue:
//!
//! ```text
//! Welcome to In-Sight(tm) 2000 Session 0
//! User: admin
//! Password:
//! User Logged In
//! ```
//!
//! After that each command is a single CR LF terminated line. The sensor
//! replies with a status code line and, on success, command specific data
//! lines (see [`response`](super::response)).
//!
//! Telnet option negotiation (`IAC` sequences, including subnegotiation) is
//! discarded; the sensor does not require any options to be accepted. An
//! escaped `IAC IAC` is read as a single 0xFF data byte.
//!
//! Replies are matched to commands purely by order. Any transport or framing
//! error partway through an exchange therefore closes the session, since
//! unread bytes of that reply would otherwise be taken as the next one.
//!
//! # Example
//!
//! ```no_run
//! use insight::native::{DeviceSession, NativeModeClient};
//!
//! let mut client = NativeModeClient::connect_host("10.0.0.151", 23, "admin", "")?;
//! let response = client.send_command("GO")?;
//! println!("Online: {:?}", response.field("Online"));
//! client.disconnect()?;
//! # Ok::<(), insight::native::SessionError>(())
//! ```

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::response::{status_message, Response, ResponseShape};
use super::session::{DeviceSession, SessionError, SessionResult};

/// Default Native Mode (Telnet) port.
pub const DEFAULT_PORT: u16 = 23;

/// Default timeout for socket reads and writes.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(7);

/// Telnet "interpret as command" byte.
const IAC: u8 = 0xFF;
/// Telnet subnegotiation start and end.
const SB: u8 = 0xFA;
const SE: u8 = 0xF0;
/// Telnet WILL, WONT, DO, DONT carry one option byte.
const WILL: u8 = 0xFB;
const DONT: u8 = 0xFE;

/// Longest line or prompt accepted from the sensor.
const MAX_LINE: usize = 4096;

const USER_PROMPT: &str = "User:";
const PASSWORD_PROMPT: &str = "Password:";
const LOGGED_IN: &str = "User Logged In";

/// Native Mode session over a TCP socket.
pub struct NativeModeClient {
    stream: TcpStream,
    connected: bool,
}

impl NativeModeClient {
    /// Connect to a sensor and log in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ConnectionFailed`] if the socket cannot be
    /// opened or the sensor rejects the credentials.
    pub fn connect<A: ToSocketAddrs>(addr: A, user: &str, pass: &str) -> SessionResult<Self> {
        let stream = TcpStream::connect(&addr)
            .map_err(|e| SessionError::ConnectionFailed(format!("Failed to connect: {e}")))?;

        stream.set_read_timeout(Some(DEFAULT_TIMEOUT))?;
        stream.set_write_timeout(Some(DEFAULT_TIMEOUT))?;

        let mut client = Self {
            stream,
            connected: true,
        };

        client
            .login(user, pass)
            .map_err(|e| match e {
                SessionError::ConnectionFailed(_) => e,
                other => SessionError::ConnectionFailed(format!("Login failed: {other}")),
            })?;

        debug!("Logged in to In-Sight sensor as {user}");
        Ok(client)
    }

    /// Connect using a host name and port.
    pub fn connect_host(host: &str, port: u16, user: &str, pass: &str) -> SessionResult<Self> {
        Self::connect((host, port), user, pass)
    }

    /// Set the timeout for socket reads and writes.
    ///
    /// The default is 7 seconds.
    pub fn set_timeout(&mut self, timeout: Duration) -> SessionResult<()> {
        self.stream.set_read_timeout(Some(timeout))?;
        self.stream.set_write_timeout(Some(timeout))?;
        Ok(())
    }

    fn login(&mut self, user: &str, pass: &str) -> SessionResult<()> {
        let banner = self.read_until(USER_PROMPT)?;
        trace!("Native Mode banner: {:?}", banner);
        self.write_line(user)?;

        self.read_until(PASSWORD_PROMPT)?;
        self.write_line(pass)?;

        let reply = self.read_line()?;
        if reply.contains(LOGGED_IN) {
            Ok(())
        } else {
            Err(SessionError::ConnectionFailed(format!(
                "Login rejected: {}",
                reply.trim()
            )))
        }
    }

    fn write_line(&mut self, line: &str) -> SessionResult<()> {
        self.stream.write_all(line.as_bytes())?;
        self.stream.write_all(b"\r\n")?;
        self.stream.flush()?;
        Ok(())
    }

    /// Read one data byte, skipping Telnet command sequences.
    fn read_byte(&mut self) -> SessionResult<u8> {
        loop {
            let byte = self.read_raw_byte()?;
            if byte != IAC {
                return Ok(byte);
            }

            match self.read_raw_byte()? {
                IAC => return Ok(IAC),
                SB => self.skip_subnegotiation()?,
                WILL..=DONT => {
                    self.read_raw_byte()?;
                }
                // NOP, GA and the other two-byte commands
                _ => {}
            }
        }
    }

    /// Discard everything up to and including `IAC SE`.
    fn skip_subnegotiation(&mut self) -> SessionResult<()> {
        loop {
            if self.read_raw_byte()? == IAC && self.read_raw_byte()? == SE {
                return Ok(());
            }
        }
    }

    fn read_raw_byte(&mut self) -> SessionResult<u8> {
        let mut buf = [0u8; 1];
        match self.stream.read(&mut buf) {
            Ok(0) => {
                self.connected = false;
                Err(SessionError::Closed)
            }
            Ok(_) => Ok(buf[0]),
            Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                Err(SessionError::Timeout)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read a line terminated by LF, dropping the CR LF.
    fn read_line(&mut self) -> SessionResult<String> {
        let mut bytes = Vec::new();
        loop {
            let byte = self.read_byte()?;
            if byte == b'\n' {
                break;
            }
            if byte != b'\r' {
                if bytes.len() >= MAX_LINE {
                    return Err(SessionError::InvalidResponse(format!(
                        "Line exceeds {MAX_LINE} bytes"
                    )));
                }
                bytes.push(byte);
            }
        }
        // Sensor text is Latin-1
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    /// Read until the accumulated text contains `needle` (prompts have no EOL).
    fn read_until(&mut self, needle: &str) -> SessionResult<String> {
        let mut text = String::new();
        while !text.contains(needle) {
            if text.len() >= MAX_LINE {
                return Err(SessionError::InvalidResponse(format!(
                    "No {needle:?} prompt within {MAX_LINE} bytes"
                )));
            }
            text.push(self.read_byte()? as char);
        }
        Ok(text)
    }

    fn read_response(&mut self, command: &str) -> SessionResult<Response> {
        let status = self.read_line()?;
        let mut response = Response::new(&status);

        if !response.is_ok() {
            if let Some(code) = response.status() {
                debug!("{command}: status {code} ({})", status_message(code));
            } else {
                return Err(SessionError::InvalidResponse(format!(
                    "Expected status code, got {:?}",
                    status.trim()
                )));
            }
            return Ok(response);
        }

        match ResponseShape::for_command(command) {
            ResponseShape::StatusOnly => {}
            ResponseShape::Single(field) => {
                let line = self.read_line()?;
                response.push(field, &line);
            }
            ResponseShape::Counted(field) => {
                let line = self.read_line()?;
                let count: usize = line.trim().parse().map_err(|_| {
                    SessionError::InvalidResponse(format!("Invalid entry count: {:?}", line.trim()))
                })?;
                for _ in 0..count {
                    let line = self.read_line()?;
                    response.push(field, &line);
                }
            }
        }

        Ok(response)
    }
}

impl DeviceSession for NativeModeClient {
    fn send_command(&mut self, command: &str) -> SessionResult<Response> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }

        debug!("Native Mode send: {:?}", command);
        let exchange = self
            .write_line(command)
            .and_then(|()| self.read_response(command));

        match exchange {
            Ok(response) => {
                trace!("Native Mode recv: {:?}", response);
                Ok(response)
            }
            Err(e) => {
                // Reply framing is lost; later replies cannot be trusted
                warn!("Closing Native Mode session after failed {command:?}: {e}");
                self.connected = false;
                if let Err(shutdown) = self.stream.shutdown(Shutdown::Both) {
                    debug!("Socket shutdown failed: {shutdown}");
                }
                Err(e)
            }
        }
    }

    fn disconnect(&mut self) -> SessionResult<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != ErrorKind::NotConnected => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
