//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `odoons` command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the shared [`Context`] and the parsed
//!   `Args`, and calls into the `odoons` library.
//!
//! Every command except `migrate` starts by loading the configuration file;
//! a missing or invalid file aborts the command.

pub mod addons;
pub mod config;
pub mod init;
pub mod install;
pub mod migrate;
pub mod reset;
pub mod update;
pub mod wrapper;

use std::path::{Path, PathBuf};

use anyhow::Result;

use odoons::output::Printer;
use odoons::workspace::{SyncReport, Workspace};

/// State shared by every command: where the configuration file lives and
/// how to print.
pub struct Context {
    config_file: PathBuf,
    printer: Printer,
}

impl Context {
    pub fn new(config_file: PathBuf, printer: Printer) -> Self {
        Self {
            config_file,
            printer,
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    /// Load the configuration file into a workspace rooted at the current
    /// directory.
    pub fn workspace(&self) -> Result<Workspace> {
        Ok(Workspace::load(&self.config_file, self.printer.clone())?)
    }
}

/// Install requirements after a sync unless disabled by option or flag.
pub(crate) fn cascade_install(ws: &Workspace, no_requirements: bool) -> Result<()> {
    if ws.config().options.apply_requirements && !no_requirements {
        install::run(ws, &[])?;
    } else {
        log::debug!("Skipping requirements installation");
    }
    Ok(())
}

/// Print the failure summary of a sync. Failures never change the exit code.
pub(crate) fn report_sync(printer: &Printer, report: &SyncReport) {
    if report.is_success() {
        printer.success(&format!("{} repositories up to date", report.synced.len()));
    } else {
        report.print_summary(printer);
    }
}
