//! # Config Command Implementation
//!
//! Copies the configuration template to `<config-directory>/odoo.cfg` and
//! writes the computed `addons_path` (and an absolute `data_dir`) into its
//! `[options]` section.

use anyhow::Result;
use clap::Args;

use odoons::workspace::Workspace;

use super::Context;

/// Render the runtime odoo.cfg from the configuration template
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Execute the `config` command.
pub fn execute(ctx: &Context, _args: ConfigArgs) -> Result<()> {
    let ws = ctx.workspace()?;
    run(&ws)
}

pub(crate) fn run(ws: &Workspace) -> Result<()> {
    let written = ws.write_odoo_config()?;
    log::info!("Wrote {}", written.display());
    Ok(())
}
