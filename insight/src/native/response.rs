//! Structured Native Mode responses.
//!
//! Every reply starts with a status code line. Successful queries follow it
//! with data lines whose layout depends on the command that was sent:
//!
//! ```text
//! GO            -> 1\r\n 1\r\n                 (status, online flag)
//! GF            -> 1\r\n JOB.JOB\r\n           (status, loaded file)
//! GET FILELIST  -> 1\r\n 2\r\n A.JOB\r\n B.JOB\r\n (status, count, names)
//! SO1, SW8, ... -> 1\r\n                       (status only)
//! ```
//!
//! The decoded [`Response`] is a flat list of named entries so callers can
//! look up `Online`, `FileName` or `Status` without caring about line order.

/// Field holding the status code line.
pub const STATUS_FIELD: &str = "Status";
/// Field holding the `GO` online flag.
pub const ONLINE_FIELD: &str = "Online";
/// Field holding a job file name (`GF`, `GET FILELIST`).
pub const FILE_NAME_FIELD: &str = "FileName";

/// Status code reported for a successfully executed command.
pub const STATUS_OK: i32 = 1;

/// Layout of the data lines that follow a successful status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Status line only.
    StatusOnly,
    /// Exactly one data line stored under the given field.
    Single(&'static str),
    /// A count line followed by that many data lines under the given field.
    Counted(&'static str),
}

impl ResponseShape {
    /// Pick the response layout for a raw command string.
    pub fn for_command(command: &str) -> Self {
        let command = command.trim().to_ascii_uppercase();
        if command == "GO" {
            ResponseShape::Single(ONLINE_FIELD)
        } else if command == "GF" {
            ResponseShape::Single(FILE_NAME_FIELD)
        } else if command.starts_with("GET FILELIST") {
            ResponseShape::Counted(FILE_NAME_FIELD)
        } else {
            ResponseShape::StatusOnly
        }
    }
}

/// Decoded reply to a single command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    entries: Vec<(String, String)>,
}

impl Response {
    /// Build a response from a status line and already-read data lines.
    pub fn new(status: &str) -> Self {
        let mut response = Self::default();
        response.push(STATUS_FIELD, status);
        response
    }

    /// Append a named entry. Values are stored trimmed.
    pub fn push(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.trim().to_string()));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.push(name, value);
        self
    }

    /// First value stored under `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All values stored under `name`, in arrival order.
    pub fn fields<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of every entry.
    pub fn text(&self) -> String {
        self.entries
            .iter()
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Raw status text.
    pub fn status_text(&self) -> &str {
        self.field(STATUS_FIELD).unwrap_or("")
    }

    /// Parsed status code, if the status line was numeric.
    pub fn status(&self) -> Option<i32> {
        self.status_text().parse().ok()
    }

    /// True when the sensor reported [`STATUS_OK`].
    pub fn is_ok(&self) -> bool {
        self.status() == Some(STATUS_OK)
    }
}

/// Human-readable description of a Native Mode status code.
pub fn status_message(code: i32) -> String {
    match code {
        1 => "Command executed successfully".to_string(),
        0 => "Unrecognized command".to_string(),
        -1 => "Invalid argument or file name".to_string(),
        -2 => "Command could not be executed".to_string(),
        -6 => "User does not have full access".to_string(),
        _ => format!("Unknown status ({code})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_for_command() {
        assert_eq!(ResponseShape::for_command("GO"), ResponseShape::Single(ONLINE_FIELD));
        assert_eq!(ResponseShape::for_command("gf"), ResponseShape::Single(FILE_NAME_FIELD));
        assert_eq!(
            ResponseShape::for_command("GET FILELIST"),
            ResponseShape::Counted(FILE_NAME_FIELD)
        );
        assert_eq!(ResponseShape::for_command("SW8"), ResponseShape::StatusOnly);
        assert_eq!(ResponseShape::for_command("LFA.JOB"), ResponseShape::StatusOnly);
    }

    #[test]
    fn test_repeated_fields() {
        let response = Response::new("1")
            .with(FILE_NAME_FIELD, "A.JOB")
            .with(FILE_NAME_FIELD, " B.JOB ");

        let names: Vec<&str> = response.fields(FILE_NAME_FIELD).collect();
        assert_eq!(names, vec!["A.JOB", "B.JOB"]);
        assert_eq!(response.field(FILE_NAME_FIELD), Some("A.JOB"));
        assert!(response.field(ONLINE_FIELD).is_none());
    }

    #[test]
    fn test_status_only_text_is_status() {
        let response = Response::new("1");
        assert!(response.is_ok());
        assert_eq!(response.text(), "1");

        let failed = Response::new("-2");
        assert!(!failed.is_ok());
        assert_eq!(failed.status(), Some(-2));
    }
}
