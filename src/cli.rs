//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use odoons::config::DEFAULT_CONFIG_FILE;
use odoons::output::{OutputConfig, Printer};

use crate::commands::{self, Context};

/// odoons - Manage Odoo project workspaces
#[derive(Parser, Debug)]
#[command(name = "odoons")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the project configuration file
    #[arg(short, long, global = true, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    file: PathBuf,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone the framework and addons, then install and configure
    Init(commands::init::InitArgs),

    /// Refresh the framework and every git addon
    Update(commands::update::UpdateArgs),

    /// Install Python requirements of the framework, addons and project
    Install(commands::install::InstallArgs),

    /// Render the runtime odoo.cfg from the configuration template
    Config(commands::config::ConfigArgs),

    /// Write the start_odoo launcher
    Wrapper(commands::wrapper::WrapperArgs),

    /// Delete the framework and git addon checkouts
    Reset(commands::reset::ResetArgs),

    /// Print the combined addons path
    Addons(commands::addons::AddonsArgs),

    /// Convert a legacy buildout file into the project configuration file
    Migrate(commands::migrate::MigrateArgs),
}

impl Cli {
    /// Printer honouring `--color` and the color environment variables.
    pub fn printer(&self) -> Printer {
        Printer::new(OutputConfig::from_env_and_flag(&self.color))
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let ctx = Context::new(self.file.clone(), self.printer());

        match self.command {
            Commands::Init(args) => commands::init::execute(&ctx, args),
            Commands::Update(args) => commands::update::execute(&ctx, args),
            Commands::Install(args) => commands::install::execute(&ctx, args),
            Commands::Config(args) => commands::config::execute(&ctx, args),
            Commands::Wrapper(args) => commands::wrapper::execute(&ctx, args),
            Commands::Reset(args) => commands::reset::execute(&ctx, args),
            Commands::Addons(args) => commands::addons::execute(&ctx, args),
            Commands::Migrate(args) => commands::migrate::execute(&ctx, args),
        }
    }
}

/// `RUST_LOG` takes precedence over `--log-level` when set.
fn init_logging(level: &str) {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    // Ignored when a logger is already installed.
    let _ = env_logger::Builder::new()
        .parse_filters(&filters)
        .format_timestamp(None)
        .try_init();
}
