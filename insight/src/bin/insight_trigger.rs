//! Select and trigger an inspection program on an In-Sight sensor.
//!
//! Connects over Native Mode, checks that the program exists, loads it if
//! needed and fires a software trigger. With `--repeat <ms>` the cycle runs
//! until Ctrl-C, otherwise once.
//!
//! Each failed cycle prints a stable `ERR_*` marker on stderr. The exit code
//! is 0 on success (or after a cancelled repeat loop) and 1 otherwise.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use insight::cycle::{CancellationFlag, CycleError, ProgramName, Runner, Timing};
use insight::native::{NativeModeClient, DEFAULT_PORT};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_HOST: &str = "10.0.0.151";
const DEFAULT_USER: &str = "admin";
const DEFAULT_PROGRAM: &str = "WALKNER-IPT-VISION";

/// In-Sight program trigger tool
#[derive(Parser, Debug)]
#[command(name = "insight_trigger")]
#[command(about = "Select and trigger an inspection program on a Cognex In-Sight sensor")]
#[command(version)]
struct Args {
    /// Sensor host name or IP address
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Native Mode (Telnet) port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Native Mode user
    #[arg(long, default_value = DEFAULT_USER)]
    user: String,

    /// Native Mode password
    #[arg(long, default_value = "")]
    pass: String,

    /// Program (job) to select and trigger, with or without the .job extension
    #[arg(long, default_value = DEFAULT_PROGRAM)]
    program: ProgramName,

    /// Milliseconds between cycles (0 = run once)
    #[arg(long, default_value_t = 0)]
    repeat: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("Failed to parse arguments: {e}");
            eprintln!("ERR_INVALID_ARGS");
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            eprintln!("ERR_EXCEPTION");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let cancel = CancellationFlag::new();
    cancel
        .install_interrupt_handler()
        .context("Failed to set Ctrl-C handler")?;

    info!("Connecting to {}:{} as {}...", args.host, args.port, args.user);
    let connected = NativeModeClient::connect_host(&args.host, args.port, &args.user, &args.pass);
    let session = match connected {
        Ok(session) => session,
        Err(e) => {
            report(&CycleError::ConnectionFailure(e));
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut runner = Runner::new(session, cancel, Timing::default());
    let result = runner.run(&args.program, Duration::from_millis(args.repeat), report);
    runner.shutdown();

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            report(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print the failure and its marker on stderr.
fn report(error: &CycleError) {
    if !matches!(error, CycleError::Cancelled) {
        eprintln!("{error}");
    }
    eprintln!("{}", error.marker());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["insight_trigger"]).unwrap();
        assert_eq!(args.host, "10.0.0.151");
        assert_eq!(args.port, 23);
        assert_eq!(args.user, "admin");
        assert_eq!(args.pass, "");
        assert_eq!(args.program.as_str(), "WALKNER-IPT-VISION");
        assert_eq!(args.repeat, 0);
    }

    #[test]
    fn test_program_is_normalized() {
        let args = Args::try_parse_from(["insight_trigger", "--program", "foo.job"]).unwrap();
        assert_eq!(args.program.as_str(), "FOO");
    }

    #[test]
    fn test_invalid_arguments_are_rejected() {
        assert!(Args::try_parse_from(["insight_trigger", "--repeat", "-5"]).is_err());
        assert!(Args::try_parse_from(["insight_trigger", "--repeat", "soon"]).is_err());
        assert!(Args::try_parse_from(["insight_trigger", "--port", "70000"]).is_err());
        assert!(Args::try_parse_from(["insight_trigger", "--verbose"]).is_err());
    }

    #[test]
    fn test_connection_failure_exits_with_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let args = Args::try_parse_from([
            "insight_trigger",
            "--host",
            "127.0.0.1",
            "--port",
            &port.to_string(),
        ])
        .unwrap();
        assert_eq!(run(args).unwrap(), ExitCode::FAILURE);
    }
}
