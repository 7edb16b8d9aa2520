//! # Addon Declarations
//!
//! An addon is either a git checkout or a directory that already exists on
//! disk. Both kinds share a name, a path and the optional `standalone`
//! sub-path used when a single module is taken out of a group repository.
//!
//! The `AddonRegistry` keeps declarations in the order they were written and
//! computes the combined addons path handed to the framework.

use std::path::{Path, PathBuf};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::path::absolutize;

/// Separator used by the framework's runtime file for `addons_path`.
pub const ADDONS_PATH_SEPARATOR: &str = ",";

/// Framework-relative directories always scanned before any addon.
pub const CORE_ADDONS_DIRS: [&str; 2] = ["odoo/addons", "addons"];

/// Where an addon comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AddonSource {
    /// A git repository, tracked on `branch` or frozen on `commit`.
    Git {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        branch: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        commit: Option<String>,
    },
    /// A directory managed outside of odoons.
    Local,
}

/// A single addon declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Addon {
    #[serde(skip)]
    pub name: String,
    #[serde(flatten)]
    pub source: AddonSource,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standalone: Option<String>,
    #[serde(rename = "install-requirements", skip_serializing_if = "is_true")]
    pub install_requirements: bool,
}

fn is_true(value: &bool) -> bool {
    *value
}

impl Addon {
    pub fn git(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        url: impl Into<String>,
        branch: Option<String>,
        commit: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: AddonSource::Git {
                url: url.into(),
                branch,
                commit,
            },
            path: path.into(),
            standalone: None,
            install_requirements: true,
        }
    }

    pub fn local(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: AddonSource::Local,
            path: path.into(),
            standalone: None,
            install_requirements: true,
        }
    }

    pub fn with_standalone(mut self, standalone: impl Into<String>) -> Self {
        self.standalone = Some(standalone.into());
        self
    }

    pub fn is_git(&self) -> bool {
        matches!(self.source, AddonSource::Git { .. })
    }

    /// The effective addons directory: `path`, or `path/standalone`.
    pub fn addons_dir(&self) -> PathBuf {
        match &self.standalone {
            Some(sub) if !sub.is_empty() => self.path.join(sub),
            _ => self.path.clone(),
        }
    }
}

/// Ordered set of addon declarations, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddonRegistry {
    addons: Vec<Addon>,
}

impl AddonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration. A declaration with an existing name replaces the
    /// previous one in place, keeping its position.
    pub fn insert(&mut self, addon: Addon) {
        match self.addons.iter_mut().find(|a| a.name == addon.name) {
            Some(existing) => *existing = addon,
            None => self.addons.push(addon),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Addon> {
        self.addons.iter().find(|a| a.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Addon> {
        self.addons.iter_mut().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Addon> {
        self.addons.iter()
    }

    pub fn git_addons(&self) -> impl Iterator<Item = &Addon> {
        self.addons.iter().filter(|a| a.is_git())
    }

    pub fn len(&self) -> usize {
        self.addons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }

    /// Absolute directories scanned for modules: the two framework
    /// directories first, then every addon in declaration order.
    pub fn addons_path_entries(&self, root: &Path, odoo_path: &Path) -> Vec<PathBuf> {
        let odoo_path = absolutize(root, odoo_path);
        CORE_ADDONS_DIRS
            .iter()
            .map(|dir| odoo_path.join(dir))
            .chain(self.addons.iter().map(|a| absolutize(root, &a.addons_dir())))
            .collect()
    }

    /// The entries of [`Self::addons_path_entries`] joined for the runtime file.
    pub fn combined_addons_path(&self, root: &Path, odoo_path: &Path) -> String {
        self.addons_path_entries(root, odoo_path)
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(ADDONS_PATH_SEPARATOR)
    }
}

impl<'a> IntoIterator for &'a AddonRegistry {
    type Item = &'a Addon;
    type IntoIter = std::slice::Iter<'a, Addon>;

    fn into_iter(self) -> Self::IntoIter {
        self.addons.iter()
    }
}

impl FromIterator<Addon> for AddonRegistry {
    fn from_iter<I: IntoIterator<Item = Addon>>(iter: I) -> Self {
        let mut registry = AddonRegistry::new();
        for addon in iter {
            registry.insert(addon);
        }
        registry
    }
}

impl Serialize for AddonRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.addons.len()))?;
        for addon in &self.addons {
            map.serialize_entry(&addon.name, addon)?;
        }
        map.end()
    }
}
