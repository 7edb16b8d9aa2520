//! # Init Command Implementation
//!
//! Brings a fresh checkout of the project to a runnable state:
//!
//! 1. Clone the framework (and install its command when configured).
//! 2. Clone every git addon. Failures are collected, not fatal.
//! 3. Install Python requirements, unless disabled.
//! 4. Render the runtime configuration file, unless `--skip-config`.
//! 5. Write the `start_odoo` launcher.

use anyhow::Result;
use clap::Args;

use super::{cascade_install, report_sync, Context};

/// Clone the framework and addons, then install and configure
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Do not install Python requirements
    #[arg(long)]
    pub no_requirements: bool,

    /// Do not generate the runtime configuration file
    #[arg(long)]
    pub skip_config: bool,
}

/// Execute the `init` command.
pub fn execute(ctx: &Context, args: InitArgs) -> Result<()> {
    let ws = ctx.workspace()?;

    let report = ws.pull()?;
    report_sync(ctx.printer(), &report);

    cascade_install(&ws, args.no_requirements)?;

    if !args.skip_config {
        super::config::run(&ws)?;
    }
    super::wrapper::run(&ws)?;

    Ok(())
}
