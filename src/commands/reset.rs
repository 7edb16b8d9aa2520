//! # Reset Command Implementation
//!
//! Deletes the framework checkout and every git addon checkout. Local
//! addons are never touched. Paths that are already gone are reported and
//! skipped.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Delete the framework and git addon checkouts
#[derive(Args, Debug)]
pub struct ResetArgs {}

/// Execute the `reset` command.
pub fn execute(ctx: &Context, _args: ResetArgs) -> Result<()> {
    let ws = ctx.workspace()?;
    let report = ws.reset()?;
    ctx.printer().success(&format!(
        "Removed {} checkouts ({} already absent)",
        report.removed.len(),
        report.already_absent.len()
    ));
    Ok(())
}
