//! # Configuration Model and Parsing
//!
//! This module defines the `odoons.yml` document and the logic for loading
//! and validating it. The document has a single `odoons` root with three
//! sections:
//!
//! ```yaml
//! odoons:
//!   odoo:
//!     path: parts/odoo
//!     url: https://github.com/odoo/odoo
//!     version: "14.0"
//!     options:
//!       data_dir: data
//!   addons:
//!     web:
//!       type: git
//!       url: https://github.com/OCA/web.git
//!       path: parts/web
//!       branch: "14.0"
//!     extra:
//!       type: local
//!       path: vendor/extra
//!   options:
//!     apply-requirements: true
//! ```
//!
//! Parsing goes through loosely typed raw structures first so that missing
//! keys produce hinted `ConfigParse` errors instead of bare serde messages,
//! and so that YAML scalars such as `version: 14.0` can be read as strings.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::addons::{Addon, AddonRegistry, AddonSource};
use crate::error::{Error, Result};

/// Default location of the project configuration document.
pub const DEFAULT_CONFIG_FILE: &str = "odoons.yml";

/// Framework repository used when `odoo.url` is omitted.
pub const DEFAULT_ODOO_URL: &str = "https://github.com/odoo/odoo";

/// Runtime option holding the framework's data directory.
pub const DATA_DIR_OPTION: &str = "data_dir";

/// Tool-level options. Every field has a default; the document only
/// overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Options {
    pub apply_requirements: bool,
    pub install_odoo_command: bool,
    pub config_template: PathBuf,
    pub config_directory: PathBuf,
    pub bin_directory: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            apply_requirements: true,
            install_odoo_command: true,
            config_template: PathBuf::from("odoo.cfg.template"),
            config_directory: PathBuf::from("etc"),
            bin_directory: PathBuf::from("bin"),
        }
    }
}

/// The framework declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Odoo {
    pub path: PathBuf,
    pub url: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl Odoo {
    pub fn new(path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: DEFAULT_ODOO_URL.to_string(),
            version: version.into(),
            commit: None,
            options: BTreeMap::new(),
        }
    }
}

/// A loaded `odoons.yml` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub odoo: Odoo,
    pub addons: AddonRegistry,
    pub options: Options,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    odoons: SectionRef<'a>,
}

#[derive(Serialize)]
struct SectionRef<'a> {
    odoo: &'a Odoo,
    options: &'a Options,
    addons: &'a AddonRegistry,
}

#[derive(Deserialize)]
struct RawDocument {
    odoons: Option<RawSection>,
}

#[derive(Deserialize)]
struct RawSection {
    odoo: Option<RawOdoo>,
    addons: Option<Mapping>,
    options: Option<Options>,
}

#[derive(Deserialize)]
struct RawOdoo {
    path: Option<String>,
    url: Option<String>,
    version: Option<Value>,
    #[serde(alias = "freeze")]
    commit: Option<Value>,
    options: Option<Mapping>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawAddon {
    #[serde(rename = "type")]
    kind: Option<String>,
    path: Option<String>,
    url: Option<String>,
    branch: Option<Value>,
    #[serde(alias = "freeze")]
    commit: Option<Value>,
    standalone: Option<String>,
    install_requirements: Option<bool>,
}

/// Read a YAML scalar as a string; `null` reads as absent.
fn scalar(value: &Value, field: &str) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(Error::config(format!("`{}` must be a scalar value", field))),
    }
}

fn optional_scalar(value: Option<&Value>, field: &str) -> Result<Option<String>> {
    match value {
        Some(v) => scalar(v, field),
        None => Ok(None),
    }
}

impl Config {
    /// Load and validate a configuration document from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config_with_hint(
                format!("cannot read {}: {}", path.display(), e),
                "select another file with --file, or create one with `odoons migrate`",
            )
        })?;
        Self::parse(&content).map_err(|e| match e {
            Error::ConfigParse { message, hint } => Error::ConfigParse {
                message: format!("{}: {}", path.display(), message),
                hint,
            },
            other => other,
        })
    }

    /// Parse and validate a configuration document.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: Option<RawDocument> = serde_yaml::from_str(content)?;
        let section = raw.and_then(|doc| doc.odoons).ok_or_else(|| {
            Error::config_with_hint(
                "missing `odoons` section",
                "the document must start with a top-level `odoons:` key",
            )
        })?;

        let odoo = Self::parse_odoo(section.odoo)?;

        let mut addons = AddonRegistry::new();
        for (key, value) in section.addons.unwrap_or_default() {
            let name = scalar(&key, "addons")?
                .ok_or_else(|| Error::config("addon names must not be empty"))?;
            addons.insert(Self::parse_addon(name, value)?);
        }

        Ok(Self {
            odoo,
            addons,
            options: section.options.unwrap_or_default(),
        })
    }

    fn parse_odoo(raw: Option<RawOdoo>) -> Result<Odoo> {
        let raw = raw.ok_or_else(|| {
            Error::config_with_hint(
                "missing `odoons.odoo` section",
                "declare the framework checkout with `path` and `version`",
            )
        })?;

        let path = raw.path.ok_or_else(|| {
            Error::config_with_hint(
                "missing `odoo.path`",
                "add `path: parts/odoo` under `odoo`",
            )
        })?;
        let version = optional_scalar(raw.version.as_ref(), "odoo.version")?.ok_or_else(|| {
            Error::config_with_hint(
                "missing `odoo.version`",
                "add the framework branch, e.g. `version: \"14.0\"`",
            )
        })?;

        let mut options = BTreeMap::new();
        for (key, value) in raw.options.unwrap_or_default() {
            let key = scalar(&key, "odoo.options")?
                .ok_or_else(|| Error::config("empty key in `odoo.options`"))?;
            let field = format!("odoo.options.{}", key);
            let value = scalar(&value, &field)?.unwrap_or_default();
            options.insert(key, value);
        }

        Ok(Odoo {
            path: PathBuf::from(path),
            url: raw.url.unwrap_or_else(|| DEFAULT_ODOO_URL.to_string()),
            version,
            commit: optional_scalar(raw.commit.as_ref(), "odoo.commit")?,
            options,
        })
    }

    fn parse_addon(name: String, value: Value) -> Result<Addon> {
        let raw: RawAddon = serde_yaml::from_value(value)
            .map_err(|e| Error::config(format!("invalid addon `{}`: {}", name, e)))?;

        let path = raw.path.ok_or_else(|| {
            Error::config_with_hint(
                format!("missing `path` for addon `{}`", name),
                "every addon needs a `path`",
            )
        })?;

        let source = match raw.kind.as_deref().unwrap_or("git") {
            "git" => {
                let url = raw.url.ok_or_else(|| {
                    Error::config_with_hint(
                        format!("missing `url` for git addon `{}`", name),
                        "add the repository `url`, or set `type: local`",
                    )
                })?;
                let branch = optional_scalar(raw.branch.as_ref(), "branch")?;
                let commit = optional_scalar(raw.commit.as_ref(), "commit")?;
                if branch.is_none() && commit.is_none() {
                    return Err(Error::config_with_hint(
                        format!("git addon `{}` has neither `branch` nor `commit`", name),
                        "track a branch with `branch:` or pin it with `commit:`",
                    ));
                }
                AddonSource::Git {
                    url,
                    branch,
                    commit,
                }
            }
            "local" => AddonSource::Local,
            other => {
                return Err(Error::config_with_hint(
                    format!("unknown type `{}` for addon `{}`", other, name),
                    "supported types are `git` and `local`",
                ))
            }
        };

        Ok(Addon {
            name,
            source,
            path: PathBuf::from(path),
            standalone: raw.standalone.filter(|s| !s.is_empty()),
            install_requirements: raw.install_requirements.unwrap_or(true),
        })
    }

    /// Serialize the document back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        let document = DocumentRef {
            odoons: SectionRef {
                odoo: &self.odoo,
                options: &self.options,
                addons: &self.addons,
            },
        };
        Ok(serde_yaml::to_string(&document)?)
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }
}
