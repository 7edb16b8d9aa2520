//! # odoons CLI
//!
//! This is the binary entry point for the `odoons` command-line tool.
//!
//! It parses the command line with `clap` and dispatches to the matching
//! subcommand. A failing command prints its error chain to stderr and the
//! process exits with status 1; clap usage errors exit with status 2.
//!
//! The core logic lives in the `odoons` library crate; the binary stays a
//! thin wrapper around it.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let printer = cli.printer();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            printer.error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}
