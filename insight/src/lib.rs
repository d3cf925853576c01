//! Drive Cognex In-Sight vision sensors over Native Mode.
//!
//! - [`native`] - Telnet session, command vocabulary and response decoding
//! - [`cycle`] - program check, selection and trigger with bounded polling

pub mod cycle;
pub mod native;
