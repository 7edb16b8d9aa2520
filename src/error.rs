//! # Error Handling
//!
//! This module defines the centralized error type for `odoons`. It uses the
//! `thiserror` library to describe every anticipated failure mode with enough
//! context for the user to act on it.
//!
//! ## Taxonomy
//!
//! - **Fatal**: configuration parsing problems, missing templates, broken
//!   legacy buildout chains and installer failures abort the running command.
//! - **Per-item**: a `Sync` error wraps whatever went wrong while cloning or
//!   updating a single declaration. Callers collect these in a report and
//!   keep going with the next declaration.
//!
//! The `Result` type alias is used throughout the library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for odoons operations
#[derive(Error, Debug)]
pub enum Error {
    /// The project configuration document is malformed or incomplete.
    ///
    /// Includes an optional hint about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The template used to render the runtime configuration file is missing.
    #[error("Configuration template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    /// The legacy buildout hierarchy could not be read or reduced.
    #[error("Buildout error in {}: {message}", path.display())]
    Buildout { path: PathBuf, message: String },

    /// A git invocation exited unsuccessfully or could not be spawned.
    #[error("Git command failed in {}: git {command} - {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// Synchronizing a single declaration failed.
    ///
    /// The declaration name is attached so batch summaries can name it.
    #[error("Failed to synchronize {name}: {source}")]
    Sync {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// The dependency installer exited unsuccessfully or could not be spawned.
    #[error("Installer failed for {}: {message}", path.display())]
    Installer { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Builds a `ConfigParse` error without a hint.
    pub fn config(message: impl Into<String>) -> Self {
        Error::ConfigParse {
            message: message.into(),
            hint: None,
        }
    }

    /// Builds a `ConfigParse` error carrying a hint.
    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Error::ConfigParse {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config_parse() {
        let error = Error::config("missing odoons section");
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("missing odoons section"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::config_with_hint("missing odoo.path", "Add 'path:' under 'odoo'");
        let display = format!("{}", error);
        assert!(display.contains("missing odoo.path"));
        assert!(display.contains("hint:"));
        assert!(display.contains("Add 'path:'"));
    }

    #[test]
    fn test_error_display_git_command() {
        let error = Error::GitCommand {
            command: "fetch origin".to_string(),
            path: PathBuf::from("/work/parts/odoo"),
            stderr: "Could not resolve host".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("git fetch origin"));
        assert!(display.contains("/work/parts/odoo"));
        assert!(display.contains("Could not resolve host"));
    }

    #[test]
    fn test_error_display_sync_names_declaration() {
        let error = Error::Sync {
            name: "web_addons".to_string(),
            source: Box::new(Error::GitCommand {
                command: "clone".to_string(),
                path: PathBuf::from("parts/web_addons"),
                stderr: "Repository not found".to_string(),
            }),
        };
        let display = format!("{}", error);
        assert!(display.starts_with("Failed to synchronize web_addons"));
        assert!(display.contains("Repository not found"));
    }

    #[test]
    fn test_error_display_buildout() {
        let error = Error::Buildout {
            path: PathBuf::from("buildout.cfg"),
            message: "missing [buildout] section".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("buildout.cfg"));
        assert!(display.contains("missing [buildout] section"));
    }

    #[test]
    fn test_error_display_template_not_found() {
        let error = Error::TemplateNotFound {
            path: PathBuf::from("odoo.cfg.template"),
        };
        assert!(format!("{}", error).contains("odoo.cfg.template"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(format!("{}", error).contains("YAML parsing error"));
    }
}
