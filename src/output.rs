//! # Console Output
//!
//! User-facing progress lines for the `odoons` CLI. Headings are bold,
//! warnings orange, errors red and external command echoes muted, provided
//! the terminal and the user allow colors.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;

use console::{style, StyledObject};

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always", "never" or "auto".
    /// In auto mode colors are disabled by `NO_COLOR`, `CLICOLOR=0`,
    /// `TERM=dumb`, or a non-TTY stdout (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Prints progress lines to stdout with the configured styling.
#[derive(Debug, Clone, Default)]
pub struct Printer {
    config: OutputConfig,
}

impl Printer {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// A printer that never colors, for tests and piped output.
    pub fn plain() -> Self {
        Self {
            config: OutputConfig { use_color: false },
        }
    }

    fn paint<'a>(&self, styled: StyledObject<&'a str>) -> StyledObject<&'a str> {
        styled.force_styling(self.config.use_color)
    }

    pub fn info(&self, msg: &str) {
        println!("{}", self.paint(style(msg).bold()));
    }

    pub fn success(&self, msg: &str) {
        println!("{}", self.paint(style(msg).green().bold()));
    }

    /// Warnings go to stdout alongside progress so summaries stay in order.
    pub fn warning(&self, msg: &str) {
        println!("{}", self.paint(style(msg).color256(208)));
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.paint(style(msg).red()));
    }

    pub fn muted(&self, msg: &str) {
        println!("{}", self.paint(style(msg).dim()));
    }

    /// Plain, unstyled output for machine-consumable values.
    pub fn raw(&self, msg: &str) {
        println!("{}", msg);
    }

    pub fn uses_color(&self) -> bool {
        self.config.use_color
    }
}
