//! Command-line client and server launcher for the stag status aggregator.
//!
//! `stag server` hands control to [`stagd::run_server`]. `stag block` and
//! `stag debug` send a single JSON request to a running server and report
//! its response.

mod cli;
mod command;
mod errors;
mod markup;
mod transport;

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use serde_json::Value;
use stag_config::{Config, LoadedConfig};

use crate::cli::{Cli, CliCommand};
use crate::command::{BlockPayload, debug_request};
use crate::errors::AppError;

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, stdout, stderr),
    };
    match execute(cli, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn report_usage<W, E>(error: &clap::Error, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    W: Write,
    E: Write,
{
    let rendered = error.render();
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(stdout, "{rendered}");
            ExitCode::SUCCESS
        }
        _ => {
            let _ = write!(stderr, "{rendered}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(cli: Cli, stdout: &mut W) -> Result<(), AppError> {
    let loaded = load_config(&cli);
    match cli.command {
        CliCommand::Server => Ok(stagd::run_server(loaded)?),
        CliCommand::Block(args) => {
            let endpoint = loaded.config.socket_endpoint();
            let response = transport::exchange(&endpoint, &BlockPayload::from(args))?;
            if response.success {
                Ok(())
            } else {
                Err(AppError::Rejected(response.message))
            }
        }
        CliCommand::Debug => {
            let endpoint = loaded.config.socket_endpoint();
            let response = transport::exchange(&endpoint, &debug_request())?;
            // The dump is flagged unsuccessful because nothing changed.
            if !is_store_dump(&response.message) {
                return Err(AppError::Rejected(response.message));
            }
            writeln!(stdout, "{}", response.message).map_err(AppError::WriteOutput)
        }
    }
}

fn is_store_dump(message: &str) -> bool {
    matches!(serde_json::from_str::<Value>(message), Ok(Value::Array(_)))
}

fn load_config(cli: &Cli) -> LoadedConfig {
    let mut loaded = match &cli.config_path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    loaded.config.apply(&cli.overrides());
    loaded
}
