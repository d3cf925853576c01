//! In-memory sensor used by the cycle tests.
//!
//! Mode and job changes are acknowledged immediately and become visible after
//! a configurable number of status polls, like a real sensor.

use std::io;
use std::time::Duration;

use super::cancel::CancellationFlag;
use super::program::normalize;
use super::runner::Runner;
use super::timing::Timing;
use crate::native::{
    DeviceSession, Response, SessionError, SessionResult, FILE_NAME_FIELD, ONLINE_FIELD,
};

/// Short timing so timeout tests finish quickly.
pub const TEST_TIMING: Timing = Timing {
    poll_interval: Duration::from_millis(50),
    mode_timeout: Duration::from_millis(300),
    selection_timeout: Duration::from_millis(300),
};

pub fn runner(device: SimulatedDevice) -> Runner<SimulatedDevice> {
    Runner::new(device, CancellationFlag::new(), TEST_TIMING)
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    polls_left: usize,
}

#[derive(Debug)]
pub struct SimulatedDevice {
    files: Vec<String>,
    online: bool,
    loaded: String,
    mode_delay: usize,
    load_delay: usize,
    stuck_mode: bool,
    ignored_loads: usize,
    pending_mode: Option<Pending<bool>>,
    pending_load: Option<Pending<String>>,
    trigger_ack: String,
    triggers: usize,
    fail_on: Option<String>,
    reject: Option<String>,
    cancel_hook: Option<(String, usize, CancellationFlag)>,
    commands: Vec<String>,
    connected: bool,
    failing_disconnect: bool,
    disconnect_attempts: usize,
}

impl SimulatedDevice {
    /// Offline sensor with no job loaded and `files` stored.
    pub fn new(files: &[&str]) -> Self {
        Self {
            files: files.iter().map(|f| f.to_string()).collect(),
            online: false,
            loaded: String::new(),
            mode_delay: 0,
            load_delay: 0,
            stuck_mode: false,
            ignored_loads: 0,
            pending_mode: None,
            pending_load: None,
            trigger_ack: "1".to_string(),
            triggers: 0,
            fail_on: None,
            reject: None,
            cancel_hook: None,
            commands: Vec::new(),
            connected: true,
            failing_disconnect: false,
            disconnect_attempts: 0,
        }
    }

    pub fn online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    pub fn loaded(mut self, file: &str) -> Self {
        self.loaded = file.to_string();
        self
    }

    /// Number of `GO` polls that still report the old mode.
    pub fn mode_delay(mut self, polls: usize) -> Self {
        self.mode_delay = polls;
        self
    }

    /// Number of `GF` polls that still report the old job.
    pub fn load_delay(mut self, polls: usize) -> Self {
        self.load_delay = polls;
        self
    }

    /// Acknowledge mode requests but never change mode.
    pub fn stuck_mode(mut self) -> Self {
        self.stuck_mode = true;
        self
    }

    /// Acknowledge the next `count` load commands without loading anything.
    pub fn ignore_loads(mut self, count: usize) -> Self {
        self.ignored_loads = count;
        self
    }

    pub fn trigger_ack(mut self, ack: &str) -> Self {
        self.trigger_ack = ack.to_string();
        self
    }

    /// Fail the transport on every command starting with `prefix`.
    pub fn fail_on(mut self, prefix: &str) -> Self {
        self.fail_on = Some(prefix.to_string());
        self
    }

    /// Answer commands starting with `prefix` with a `-2` status.
    pub fn reject(mut self, prefix: &str) -> Self {
        self.reject = Some(prefix.to_string());
        self
    }

    pub fn failing_disconnect(mut self) -> Self {
        self.failing_disconnect = true;
        self
    }

    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    /// Raise `flag` when the `nth` command equal to `command` arrives.
    pub fn cancel_after(&mut self, command: &str, nth: usize, flag: CancellationFlag) {
        self.cancel_hook = Some((command.to_string(), nth, flag));
    }

    pub fn add_file(&mut self, file: &str) {
        self.files.push(file.to_string());
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn count(&self, command: &str) -> usize {
        self.commands.iter().filter(|c| *c == command).count()
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn loaded_file(&self) -> &str {
        &self.loaded
    }

    pub fn triggers(&self) -> usize {
        self.triggers
    }

    pub fn disconnect_attempts(&self) -> usize {
        self.disconnect_attempts
    }

    fn advance_mode(&mut self) {
        if let Some(pending) = self.pending_mode.as_mut() {
            if pending.polls_left == 0 {
                self.online = pending.value;
                self.pending_mode = None;
            } else {
                pending.polls_left -= 1;
            }
        }
    }

    fn advance_load(&mut self) {
        if let Some(pending) = self.pending_load.as_mut() {
            if pending.polls_left == 0 {
                self.loaded = pending.value.clone();
                self.pending_load = None;
            } else {
                pending.polls_left -= 1;
            }
        }
    }

    fn respond(&mut self, command: &str) -> Response {
        if self.reject.as_deref().is_some_and(|p| command.starts_with(p)) {
            return Response::new("-2");
        }

        match command {
            "GET FILELIST" => self
                .files
                .iter()
                .fold(Response::new("1"), |r, f| r.with(FILE_NAME_FIELD, f)),
            "GO" => {
                self.advance_mode();
                let flag = if self.online { "1" } else { "0" };
                Response::new("1").with(ONLINE_FIELD, flag)
            }
            "SO0" | "SO1" => {
                if !self.stuck_mode {
                    self.pending_mode = Some(Pending {
                        value: command == "SO1",
                        polls_left: self.mode_delay,
                    });
                }
                Response::new("1")
            }
            "GF" => {
                self.advance_load();
                Response::new("1").with(FILE_NAME_FIELD, &self.loaded)
            }
            "SW8" => {
                self.triggers += 1;
                Response::new(&self.trigger_ack)
            }
            load if load.starts_with("LF") => {
                if self.online {
                    return Response::new("-2");
                }
                if self.ignored_loads > 0 {
                    self.ignored_loads -= 1;
                } else {
                    self.pending_load = Some(Pending {
                        value: normalize(&load[2..]),
                        polls_left: self.load_delay,
                    });
                }
                Response::new("1")
            }
            _ => Response::new("0"),
        }
    }
}

impl DeviceSession for SimulatedDevice {
    fn send_command(&mut self, command: &str) -> SessionResult<Response> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        self.commands.push(command.to_string());

        if let Some((hook, nth, flag)) = &self.cancel_hook {
            if command == hook && self.count(hook) == *nth {
                flag.cancel();
            }
        }

        if self.fail_on.as_deref().is_some_and(|p| command.starts_with(p)) {
            return Err(SessionError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "simulated transport failure",
            )));
        }

        Ok(self.respond(command))
    }

    fn disconnect(&mut self) -> SessionResult<()> {
        self.disconnect_attempts += 1;
        self.connected = false;
        if self.failing_disconnect {
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
