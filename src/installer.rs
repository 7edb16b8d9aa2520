//! Python dependency installation.
//!
//! The framework and addons ship a `requirements.txt` at their root. The
//! [`PackageInstaller`] trait hides the installer so command orchestration
//! can be tested without touching the environment.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Dependency manifest looked up at the root of each component.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Environment variable overriding the installer executable.
pub const PIP_ENV: &str = "ODOONS_PIP";

/// Trait for dependency installation - allows mocking in tests
pub trait PackageInstaller {
    /// Install every requirement listed in `manifest`.
    fn install_requirements(&self, manifest: &Path) -> Result<()>;

    /// Install the project at `project` in editable mode, without its
    /// dependencies.
    fn install_editable(&self, project: &Path) -> Result<()>;
}

/// Installer backed by `pip`, inheriting stdout/stderr so progress stays
/// visible.
#[derive(Debug, Clone)]
pub struct Pip {
    program: String,
}

impl Default for Pip {
    fn default() -> Self {
        Self {
            program: std::env::var(PIP_ENV).unwrap_or_else(|_| "pip".to_string()),
        }
    }
}

impl Pip {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str], path: &Path) -> Result<()> {
        debug!("Running command: {} {}", self.program, args.join(" "));
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|e| Error::Installer {
                path: path.to_path_buf(),
                message: format!("could not run {}: {}", self.program, e),
            })?;

        if !status.success() {
            return Err(Error::Installer {
                path: path.to_path_buf(),
                message: format!("{} {} exited with {}", self.program, args.join(" "), status),
            });
        }
        Ok(())
    }
}

impl PackageInstaller for Pip {
    fn install_requirements(&self, manifest: &Path) -> Result<()> {
        let manifest_str = manifest.to_string_lossy().into_owned();
        self.run(&["install", "-r", manifest_str.as_str()], manifest)
    }

    fn install_editable(&self, project: &Path) -> Result<()> {
        let project_str = project.to_string_lossy().into_owned();
        self.run(&["install", "-e", project_str.as_str(), "--no-deps"], project)
    }
}

/// The manifest at the root of `dir`, if there is one.
pub fn find_manifest(dir: &Path) -> Option<std::path::PathBuf> {
    let manifest = dir.join(REQUIREMENTS_FILE);
    manifest.is_file().then_some(manifest)
}
