//! # Legacy Buildout Reader
//!
//! Reads the INI-like files used by buildout-based projects:
//!
//! - Section headers: `[section_name]`
//! - Key-value pairs: `key = value` or `key: value` (keys are lowercased)
//! - Comments: lines starting with `#` or `;`
//! - Continuation lines: indented lines extend the previous value, joined
//!   with `\n`. Blank lines inside a value are dropped.
//! - `key += value` / `key -= value`: append or remove lines from the value
//!   inherited from an extended file.
//! - `${section:key}` and `${key}` references, resolved after the whole
//!   hierarchy has been merged. Unknown references are left untouched.
//!
//! A file may name its parent with `extends` in its `[buildout]` section;
//! [`hierarchy`] follows that chain.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Section every buildout file must carry.
pub const BUILDOUT_SECTION: &str = "buildout";

/// Key naming the parent file.
pub const EXTENDS_KEY: &str = "extends";

const MAX_INTERPOLATION_DEPTH: usize = 10;

/// How an entry combines with an inherited value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Set,
    Append,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub assignment: Assignment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<Entry>,
}

/// One parsed buildout file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildoutFile {
    pub path: PathBuf,
    pub sections: Vec<Section>,
}

impl BuildoutFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Buildout {
            path: path.to_path_buf(),
            message: format!("cannot read file: {}", e),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            sections: parse(&content),
        })
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Last plain assignment of `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?
            .entries
            .iter()
            .rev()
            .find(|e| e.key == key && e.assignment == Assignment::Set)
            .map(|e| e.value.as_str())
    }
}

/// Parse buildout content into sections, in file order.
///
/// Entries before the first header are dropped, as buildout has no root
/// section.
pub fn parse(content: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let indented = line.starts_with(' ') || line.starts_with('\t');
        if indented {
            if let Some(entry) = sections.last_mut().and_then(|s| s.entries.last_mut()) {
                if !trimmed.starts_with('#') && !trimmed.starts_with(';') {
                    if !entry.value.is_empty() {
                        entry.value.push('\n');
                    }
                    entry.value.push_str(trimmed);
                }
                continue;
            }
        }

        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            sections.push(Section {
                name: trimmed[1..trimmed.len() - 1].trim().to_string(),
                entries: Vec::new(),
            });
            continue;
        }

        let Some(section) = sections.last_mut() else {
            continue;
        };
        if let Some(entry) = parse_entry(trimmed) {
            section.entries.push(entry);
        }
    }

    sections
}

fn parse_entry(line: &str) -> Option<Entry> {
    let pos = line.find(['=', ':'])?;
    let (raw_key, raw_value) = (&line[..pos], line[pos + 1..].trim());

    let (key, assignment) = if let Some(key) = raw_key.strip_suffix('+') {
        (key, Assignment::Append)
    } else if let Some(key) = raw_key.strip_suffix('-') {
        (key, Assignment::Remove)
    } else {
        (raw_key, Assignment::Set)
    };

    let key = key.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }

    Some(Entry {
        key,
        value: raw_value.to_string(),
        assignment,
    })
}

/// Follow the `extends` chain starting at `start`.
///
/// Returns the files base-first, so that later entries override earlier
/// ones when read in order. Every file must have a `[buildout]` section;
/// missing targets and cycles are errors.
pub fn hierarchy(start: &Path) -> Result<Vec<BuildoutFile>> {
    let mut chain: Vec<BuildoutFile> = Vec::new();
    let mut seen = HashSet::new();
    let mut current = start.to_path_buf();

    loop {
        if !current.is_file() {
            return Err(Error::Buildout {
                path: current,
                message: match chain.last() {
                    Some(child) => format!(
                        "extended file does not exist (referenced from {})",
                        child.path.display()
                    ),
                    None => "file does not exist".to_string(),
                },
            });
        }

        let identity = fs::canonicalize(&current)?;
        if !seen.insert(identity) {
            return Err(Error::Buildout {
                path: current,
                message: "circular extends chain".to_string(),
            });
        }

        let file = BuildoutFile::read(&current)?;
        if file.section(BUILDOUT_SECTION).is_none() {
            return Err(Error::Buildout {
                path: current,
                message: format!("missing [{}] section", BUILDOUT_SECTION),
            });
        }

        let parent = file
            .get(BUILDOUT_SECTION, EXTENDS_KEY)
            .map(str::trim)
            .filter(|target| !target.is_empty())
            .map(|target| {
                current
                    .parent()
                    .unwrap_or_else(|| Path::new(""))
                    .join(target)
            });

        chain.push(file);
        match parent {
            Some(next) => current = next,
            None => break,
        }
    }

    chain.reverse();
    Ok(chain)
}

/// Values of every section merged across `files` (base-first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedConfig {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl MergedConfig {
    pub fn merge(files: &[BuildoutFile]) -> Self {
        let mut merged = MergedConfig::default();
        for file in files {
            for section in &file.sections {
                let values = merged.sections.entry(section.name.clone()).or_default();
                for entry in &section.entries {
                    apply(values, entry);
                }
            }
        }
        merged
    }

    /// The interpolated value of `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        let raw = self.sections.get(section)?.get(key)?;
        Some(self.interpolate(section, raw, 0))
    }

    /// Every interpolated key/value of `section`, sorted by key.
    pub fn section(&self, section: &str) -> Vec<(String, String)> {
        self.sections
            .get(section)
            .map(|values| {
                values
                    .iter()
                    .map(|(k, v)| (k.clone(), self.interpolate(section, v, 0)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn interpolate(&self, section: &str, value: &str, depth: usize) -> String {
        if depth >= MAX_INTERPOLATION_DEPTH || !value.contains("${") {
            return value.to_string();
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };

            let reference = &after[..end];
            let (ref_section, ref_key) = match reference.split_once(':') {
                Some((s, k)) => (s.trim(), k.trim()),
                None => (section, reference.trim()),
            };
            let resolved = self
                .sections
                .get(ref_section)
                .and_then(|values| values.get(&ref_key.to_lowercase()));
            match resolved {
                Some(v) => out.push_str(&self.interpolate(ref_section, v, depth + 1)),
                None => out.push_str(&rest[start..start + 2 + end + 1]),
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }
}

fn apply(values: &mut BTreeMap<String, String>, entry: &Entry) {
    match entry.assignment {
        Assignment::Set => {
            values.insert(entry.key.clone(), entry.value.clone());
        }
        Assignment::Append => {
            let current = values.entry(entry.key.clone()).or_default();
            if !current.is_empty() && !entry.value.is_empty() {
                current.push('\n');
            }
            current.push_str(&entry.value);
        }
        Assignment::Remove => {
            if let Some(current) = values.get_mut(&entry.key) {
                let removed: HashSet<&str> = entry.value.lines().map(str::trim).collect();
                *current = current
                    .lines()
                    .filter(|line| !removed.contains(line.trim()))
                    .collect::<Vec<_>>()
                    .join("\n");
            }
        }
    }
}
