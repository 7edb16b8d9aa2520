//! # Workspace Orchestration
//!
//! A [`Workspace`] binds a loaded [`Config`] to a root directory and to the
//! external tools (git, pip). Each subcommand of the CLI maps to one method
//! here, which keeps the binary thin and lets the orchestration be tested
//! with mock tools.
//!
//! Per-declaration failures never abort a batch: clone and fetch errors are
//! collected in a [`SyncReport`], missing requirement files in an
//! [`InstallReport`]. Structural problems (missing template, installer
//! failure) are returned as errors.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::addons::{Addon, AddonSource};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::git::{remove_tree, GitOperations, Repository, SystemGit, Target};
use crate::installer::{find_manifest, PackageInstaller, Pip};
use crate::odoo_config::{self, ODOO_CONFIG_FILE};
use crate::output::Printer;
use crate::path::absolutize;

/// Name used for the framework in reports and `--exclude`.
pub const ODOO_COMPONENT: &str = "odoo";

/// Name used for the project root in reports and `--exclude`.
pub const PROJECT_COMPONENT: &str = "project";

/// Outcome of synchronizing a batch of repositories.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: Vec<String>,
    pub failures: Vec<Error>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Names of the declarations that failed.
    pub fn failed_names(&self) -> Vec<&str> {
        self.failures
            .iter()
            .map(|e| match e {
                Error::Sync { name, .. } => name.as_str(),
                _ => "<unknown>",
            })
            .collect()
    }

    fn record(&mut self, name: &str, result: Result<()>) {
        match result {
            Ok(()) => self.synced.push(name.to_string()),
            Err(e) => {
                warn!("{}", e);
                self.failures.push(e);
            }
        }
    }

    /// Print the end-of-run warning summary, if anything failed.
    pub fn print_summary(&self, printer: &Printer) {
        if self.failures.is_empty() {
            return;
        }
        printer.warning("Some repositories could not be synchronized");
        printer.warning("Check execution logs for the following:");
        for failure in &self.failures {
            printer.warning(&format!("  {}", failure));
        }
    }
}

/// Outcome of a requirements installation pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub missing: Vec<String>,
    pub excluded: Vec<String>,
}

/// Outcome of a reset.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub removed: Vec<PathBuf>,
    pub already_absent: Vec<PathBuf>,
}

/// A project workspace: configuration, root directory and tools.
pub struct Workspace {
    root: PathBuf,
    config: Config,
    git: Box<dyn GitOperations>,
    installer: Box<dyn PackageInstaller>,
    printer: Printer,
}

impl Workspace {
    /// Creates a workspace using the system `git` and `pip`.
    pub fn new(root: impl Into<PathBuf>, config: Config, printer: Printer) -> Self {
        Self::with_operations(
            root,
            config,
            printer,
            Box::new(SystemGit::default()),
            Box::new(Pip::default()),
        )
    }

    /// Creates a workspace with custom tool implementations.
    ///
    /// This is primarily used for testing to inject mock operations.
    pub fn with_operations(
        root: impl Into<PathBuf>,
        config: Config,
        printer: Printer,
        git: Box<dyn GitOperations>,
        installer: Box<dyn PackageInstaller>,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            git,
            installer,
            printer,
        }
    }

    /// Load `config_file` and root the workspace at the current directory.
    pub fn load(config_file: &Path, printer: Printer) -> Result<Self> {
        debug!("Loading configuration from {}", config_file.display());
        let config = Config::from_file(config_file)?;
        let root = std::env::current_dir()?;
        Ok(Self::new(root, config, printer))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        absolutize(&self.root, path)
    }

    /// The framework checkout.
    pub fn odoo_repository(&self) -> Repository {
        let odoo = &self.config.odoo;
        let target = Target::from_parts(Some(&odoo.version), odoo.commit.as_deref())
            .unwrap_or_else(|| Target::Branch(odoo.version.clone()));
        Repository::new(
            ODOO_COMPONENT,
            self.resolve(&odoo.path),
            odoo.url.clone(),
            target,
        )
    }

    /// The checkout of a git addon; `None` for local addons.
    pub fn addon_repository(&self, addon: &Addon) -> Option<Repository> {
        match &addon.source {
            AddonSource::Git {
                url,
                branch,
                commit,
            } => {
                let target = Target::from_parts(branch.as_deref(), commit.as_deref())?;
                Some(Repository::new(
                    addon.name.clone(),
                    self.resolve(&addon.addons_dir()),
                    url.clone(),
                    target,
                ))
            }
            AddonSource::Local => None,
        }
    }

    /// Clone (or refresh) the framework and every git addon.
    ///
    /// When `install-odoo-command` is set and the framework is available,
    /// the framework is installed into the environment in editable mode.
    pub fn pull(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        self.printer.info("Cloning Odoo core...");
        let odoo = self.odoo_repository();
        if let Target::Commit(commit) = &odoo.target {
            self.printer
                .muted(&format!("Repository is frozen to: {}", commit));
        }
        let odoo_result = odoo.ensure_local_copy(self.git.as_ref());
        let odoo_ok = odoo_result.is_ok();
        report.record(ODOO_COMPONENT, odoo_result);

        if odoo_ok && self.config.options.install_odoo_command {
            self.printer.info("Installing odoo command...");
            self.installer.install_editable(&odoo.path)?;
        }

        self.printer.info("Cloning addons...");
        for addon in self.config.addons.iter() {
            let Some(repository) = self.addon_repository(addon) else {
                debug!("Skipping local addons {}", addon.name);
                continue;
            };
            self.printer.info(&format!("Initializing {}...", addon.name));
            report.record(&addon.name, repository.ensure_local_copy(self.git.as_ref()));
        }

        Ok(report)
    }

    /// Refresh the framework and every git addon.
    pub fn update(&self) -> SyncReport {
        let mut report = SyncReport::default();

        self.printer.info("Updating Odoo core...");
        let odoo = self.odoo_repository();
        report.record(ODOO_COMPONENT, odoo.refresh(self.git.as_ref()));

        self.printer.info("Updating addons...");
        for addon in self.config.addons.iter() {
            if let Some(repository) = self.addon_repository(addon) {
                self.printer.info(&format!("Updating {}...", addon.name));
                report.record(&addon.name, repository.refresh(self.git.as_ref()));
            }
        }

        report
    }

    /// Install the requirements of the framework, the addons and the
    /// project root. Components named in `exclude` are skipped, so are
    /// addons with `install-requirements: false`.
    pub fn install(&self, exclude: &[String]) -> Result<InstallReport> {
        self.printer.info("Installing python dependencies...");
        let mut report = InstallReport::default();

        let mut components = vec![(
            ODOO_COMPONENT.to_string(),
            self.resolve(&self.config.odoo.path),
        )];
        for addon in self.config.addons.iter() {
            if addon.install_requirements {
                components.push((addon.name.clone(), self.resolve(&addon.addons_dir())));
            } else {
                debug!("Requirements disabled for {}", addon.name);
            }
        }
        components.push((PROJECT_COMPONENT.to_string(), self.root.clone()));

        for (name, dir) in components {
            if exclude.iter().any(|excluded| excluded == &name) {
                self.printer.muted(&format!("Ignoring {}", name));
                report.excluded.push(name);
                continue;
            }
            match find_manifest(&dir) {
                Some(manifest) => {
                    self.installer.install_requirements(&manifest)?;
                    report.installed.push(name);
                }
                None => {
                    warn!("No requirements file in {}", dir.display());
                    self.printer
                        .warning(&format!("No requirements file for {}", name));
                    report.missing.push(name);
                }
            }
        }

        Ok(report)
    }

    /// The combined addons path for the runtime configuration file.
    pub fn addons_path(&self) -> String {
        self.config
            .addons
            .combined_addons_path(&self.root, &self.config.odoo.path)
    }

    /// Location of the rendered runtime configuration file.
    pub fn odoo_config_path(&self) -> PathBuf {
        self.resolve(&self.config.options.config_directory)
            .join(ODOO_CONFIG_FILE)
    }

    /// Render the runtime configuration file from the template.
    pub fn write_odoo_config(&self) -> Result<PathBuf> {
        self.printer.info("Generating Odoo configuration file...");
        let template = self.resolve(&self.config.options.config_template);
        let destination = self.odoo_config_path();
        let overrides = odoo_config::overrides(&self.config.odoo, &self.root, self.addons_path());
        odoo_config::render(&template, &destination, &overrides)?;
        Ok(destination)
    }

    /// Write the `start_odoo` launcher into the bin directory.
    pub fn write_launcher(&self) -> Result<PathBuf> {
        self.printer.info("Generating wrapper...");
        odoo_config::write_launcher(
            &self.resolve(&self.config.options.bin_directory),
            &self.resolve(&self.config.odoo.path),
            &self.odoo_config_path(),
        )
    }

    /// Remove the framework and every git addon checkout.
    pub fn reset(&self) -> Result<ResetReport> {
        self.printer.info("Deleting remote addons...");
        let mut report = ResetReport::default();

        let mut paths = vec![self.resolve(&self.config.odoo.path)];
        paths.extend(
            self.config
                .addons
                .git_addons()
                .map(|addon| self.resolve(&addon.addons_dir())),
        );

        for path in paths {
            if remove_tree(&path)? {
                self.printer
                    .muted(&format!("Deleted {}", path.display()));
                report.removed.push(path);
            } else {
                self.printer
                    .warning(&format!("Path {} seems already deleted", path.display()));
                report.already_absent.push(path);
            }
        }

        Ok(report)
    }
}
