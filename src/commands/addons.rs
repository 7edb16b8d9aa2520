//! # Addons Command Implementation
//!
//! Prints the combined addons path, unstyled, so it can be consumed by
//! scripts: `odoo-bin --addons-path "$(odoons addons)"`.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Print the combined addons path
#[derive(Args, Debug)]
pub struct AddonsArgs {}

/// Execute the `addons` command.
pub fn execute(ctx: &Context, _args: AddonsArgs) -> Result<()> {
    let ws = ctx.workspace()?;
    ctx.printer().raw(&ws.addons_path());
    Ok(())
}
