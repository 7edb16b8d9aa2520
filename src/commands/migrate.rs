//! # Migrate Command Implementation
//!
//! Reads a legacy buildout file (following its `extends` chain) and writes
//! the equivalent project configuration to the file selected with `--file`.
//! This is the only command that does not load an existing configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use odoons::migrate;

use super::Context;

/// Convert a legacy buildout file into the project configuration file
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Legacy buildout file to read
    #[arg(value_name = "BUILDOUT")]
    pub source: PathBuf,
}

/// Execute the `migrate` command.
pub fn execute(ctx: &Context, args: MigrateArgs) -> Result<()> {
    let printer = ctx.printer();
    printer.info(&format!("Migrating {}...", args.source.display()));

    let migration = migrate::migrate_to_file(&args.source, ctx.config_file())?;

    for warning in &migration.warnings {
        printer.warning(warning);
    }
    printer.success(&format!(
        "Wrote {} ({} addons)",
        ctx.config_file().display(),
        migration.config.addons.len()
    ));
    Ok(())
}
