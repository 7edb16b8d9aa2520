//! # Install Command Implementation

use anyhow::Result;
use clap::Args;

use odoons::workspace::Workspace;

use super::Context;

/// Install Python requirements of the framework, addons and project
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Components to skip: `odoo`, `project` or addon names
    #[arg(short, long, value_name = "NAME", num_args = 1..)]
    pub exclude: Vec<String>,
}

/// Execute the `install` command.
pub fn execute(ctx: &Context, args: InstallArgs) -> Result<()> {
    let ws = ctx.workspace()?;
    run(&ws, &args.exclude)
}

pub(crate) fn run(ws: &Workspace, exclude: &[String]) -> Result<()> {
    let report = ws.install(exclude)?;
    log::info!(
        "Installed {} requirement files, {} missing, {} excluded",
        report.installed.len(),
        report.missing.len(),
        report.excluded.len()
    );
    Ok(())
}
