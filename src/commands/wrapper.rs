//! # Wrapper Command Implementation

use anyhow::Result;
use clap::Args;

use odoons::workspace::Workspace;

use super::Context;

/// Write the start_odoo launcher
#[derive(Args, Debug)]
pub struct WrapperArgs {}

/// Execute the `wrapper` command.
pub fn execute(ctx: &Context, _args: WrapperArgs) -> Result<()> {
    let ws = ctx.workspace()?;
    run(&ws)
}

pub(crate) fn run(ws: &Workspace) -> Result<()> {
    let launcher = ws.write_launcher()?;
    log::info!("Wrote {}", launcher.display());
    Ok(())
}
