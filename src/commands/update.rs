//! # Update Command Implementation
//!
//! Refreshes the framework and every git addon: tracked declarations are
//! hard-reset to `origin/<branch>`, frozen ones back to their commit. Local
//! modifications inside checkouts are discarded.

use anyhow::Result;
use clap::Args;

use super::{cascade_install, report_sync, Context};

/// Refresh the framework and every git addon
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Do not install Python requirements after updating
    #[arg(long)]
    pub no_requirements: bool,
}

/// Execute the `update` command.
pub fn execute(ctx: &Context, args: UpdateArgs) -> Result<()> {
    let ws = ctx.workspace()?;

    let report = ws.update();
    report_sync(ctx.printer(), &report);

    cascade_install(&ws, args.no_requirements)
}
