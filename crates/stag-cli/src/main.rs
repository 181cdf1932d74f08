//! CLI entrypoint for the stag status aggregator.
//!
//! The binary delegates to [`stag_cli::run`]. Stdout is not locked here:
//! `stag server` streams the bar output through its own stdout handle.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    stag_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
