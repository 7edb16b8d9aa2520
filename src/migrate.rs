//! # Buildout Migration
//!
//! Converts a legacy buildout hierarchy into an `odoons.yml` document. Only
//! the merged `[odoo]` section matters:
//!
//! - `version = <kind> <url> <relative-path> <version-name>` declares the
//!   framework checkout, placed under `parts/`.
//! - `options.<key> = <value>` entries become framework runtime options.
//! - `addons` lists one declaration per line:
//!   - `git <url> <path> <revision> [group=<name>]`
//!   - `local <path>`
//! - `revisions` pins checkouts after the fact: `<path> <commit>` lines pin
//!   an addon, a single-token line pins the framework.
//!
//! Lines that cannot be understood are skipped with a warning so a single
//! odd declaration does not block the migration.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::warn;
use regex::Regex;

use crate::addons::{Addon, AddonRegistry, AddonSource};
use crate::buildout::{self, MergedConfig};
use crate::config::{Config, Odoo, Options};
use crate::error::{Error, Result};
use crate::path::{basename, dirname};

/// Section holding the framework and addons declarations.
pub const ODOO_SECTION: &str = "odoo";

/// Directory buildout checks repositories out into.
pub const PARTS_DIRECTORY: &str = "parts";

const OPTIONS_PREFIX: &str = "options.";
const GROUP_OPTION: &str = "group=";

/// Whether `value` is a full, lowercase SHA-1 commit id.
pub fn is_commit_hash(value: &str) -> bool {
    static COMMIT: OnceLock<Regex> = OnceLock::new();
    COMMIT
        .get_or_init(|| Regex::new(r"^[0-9a-f]{40}$").expect("valid commit pattern"))
        .is_match(value)
}

/// Result of a migration: the new document and what was skipped.
#[derive(Debug, Clone)]
pub struct Migration {
    pub config: Config,
    pub warnings: Vec<String>,
}

/// Migrate the buildout hierarchy rooted at `buildout_file`.
pub fn migrate(buildout_file: &Path) -> Result<Migration> {
    let files = buildout::hierarchy(buildout_file)?;
    let merged = MergedConfig::merge(&files);
    Migrator::new(buildout_file).run(&merged)
}

/// Migrate and write the resulting document to `destination`.
pub fn migrate_to_file(buildout_file: &Path, destination: &Path) -> Result<Migration> {
    let migration = migrate(buildout_file)?;
    migration.config.write_to_file(destination)?;
    Ok(migration)
}

struct Migrator {
    source: PathBuf,
    warnings: Vec<String>,
}

impl Migrator {
    fn new(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            warnings: Vec::new(),
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Buildout {
            path: self.source.clone(),
            message: message.into(),
        }
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    fn run(mut self, merged: &MergedConfig) -> Result<Migration> {
        let mut odoo = self.parse_version(merged.get(ODOO_SECTION, "version"))?;

        for (key, value) in merged.section(ODOO_SECTION) {
            if let Some(option) = key.strip_prefix(OPTIONS_PREFIX) {
                odoo.options.insert(option.to_string(), value);
            }
        }

        let addons_value = merged
            .get(ODOO_SECTION, "addons")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                self.error("no addons defined, there is nothing worth migrating")
            })?;

        let mut addons = AddonRegistry::new();
        let mut declared_paths: Vec<(String, String)> = Vec::new();
        for line in addons_value.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Some((declared_path, addon)) = self.parse_addon_line(line) {
                declared_paths.push((declared_path, addon.name.clone()));
                addons.insert(addon);
            }
        }

        if let Some(revisions) = merged.get(ODOO_SECTION, "revisions") {
            self.apply_revisions(&revisions, &mut odoo, &mut addons, &declared_paths);
        }

        Ok(Migration {
            config: Config {
                odoo,
                addons,
                options: Options::default(),
            },
            warnings: self.warnings,
        })
    }

    fn parse_version(&self, value: Option<String>) -> Result<Odoo> {
        let value = value.ok_or_else(|| {
            self.error("unidentified Odoo version: check the `version` key of the [odoo] section")
        })?;
        let tokens: Vec<&str> = value.split_whitespace().collect();
        let [_, url, path, version, ..] = tokens.as_slice() else {
            return Err(self.error(format!(
                "malformed `version` value `{}`: expected `<kind> <url> <path> <version>`",
                value
            )));
        };

        let mut odoo = Odoo::new(Path::new(PARTS_DIRECTORY).join(path), *version);
        odoo.url = url.to_string();
        Ok(odoo)
    }

    /// Parse one `addons` line into the path it declared and the addon.
    fn parse_addon_line(&mut self, line: &str) -> Option<(String, Addon)> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["git", url, path, revision, options @ ..] => {
                let name = basename(path);
                let (branch, commit) = if is_commit_hash(revision) {
                    (None, Some(revision.to_string()))
                } else {
                    (Some(revision.to_string()), None)
                };
                let mut addon = Addon::git(name.clone(), *path, *url, branch, commit);

                for option in options {
                    match option.strip_prefix(GROUP_OPTION) {
                        Some(group) if !group.is_empty() => {
                            addon.path = dirname(path).join(group);
                            addon.standalone = Some(name.clone());
                        }
                        _ => self.warn(format!(
                            "Unknown option `{}` for addons {}, ignored",
                            option, name
                        )),
                    }
                }
                Some((path.to_string(), addon))
            }
            ["local", path] => Some((path.to_string(), Addon::local(basename(path), *path))),
            _ => {
                self.warn(format!("Unprocessable addons declaration: {}", line));
                None
            }
        }
    }

    fn apply_revisions(
        &mut self,
        revisions: &str,
        odoo: &mut Odoo,
        addons: &mut AddonRegistry,
        declared_paths: &[(String, String)],
    ) {
        for line in revisions.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [commit] => odoo.commit = Some(commit.to_string()),
                [path, revision] => {
                    let wanted = path.trim_end_matches('/');
                    let name = declared_paths
                        .iter()
                        .rev()
                        .find(|(declared, _)| declared.trim_end_matches('/') == wanted)
                        .map(|(_, name)| name.as_str());
                    let addon = name.and_then(|name| addons.get_mut(name));
                    match addon.map(|a| &mut a.source) {
                        Some(AddonSource::Git { commit, .. }) => {
                            *commit = Some(revision.to_string());
                        }
                        Some(AddonSource::Local) => self.warn(format!(
                            "Revision for local addons {} ignored",
                            path
                        )),
                        None => self.warn(format!("Revision for unknown addons {} ignored", path)),
                    }
                }
                _ => self.warn(format!("Unprocessable revision: {}", line)),
            }
        }
    }
}
