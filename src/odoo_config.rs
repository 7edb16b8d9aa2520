//! # Runtime Configuration File
//!
//! Renders the framework's `odoo.cfg`: the template is copied to the
//! destination, then computed values are written into its `[options]`
//! section. Keys the tool does not compute are left untouched.
//!
//! Also writes the `start_odoo` launcher pointing at that file.

use std::fs;
use std::path::{Path, PathBuf};

use ini::{EscapePolicy, Ini, ParseOption};
use log::debug;

use crate::config::{Odoo, DATA_DIR_OPTION};
use crate::error::{Error, Result};
use crate::path::absolutize;

/// Name of the rendered runtime configuration file.
pub const ODOO_CONFIG_FILE: &str = "odoo.cfg";

/// Section receiving every override.
pub const OPTIONS_SECTION: &str = "options";

/// Runtime option listing module directories.
pub const ADDONS_PATH_OPTION: &str = "addons_path";

/// Name of the generated launcher script.
pub const LAUNCHER_FILE: &str = "start_odoo";

/// Indentation of continuation lines in multi-line values.
const CONTINUATION_INDENT: &str = "    ";

/// Ordered key/value overrides for the `[options]` section.
pub type Overrides = Vec<(String, String)>;

/// Compute the overrides for a framework declaration.
///
/// Declared options come first, with `data_dir` made absolute against
/// `root`; the combined addons path always comes last and wins over a
/// declared `addons_path`.
pub fn overrides(odoo: &Odoo, root: &Path, addons_path: String) -> Overrides {
    let mut out: Overrides = odoo
        .options
        .iter()
        .filter(|(key, _)| key.as_str() != ADDONS_PATH_OPTION)
        .map(|(key, value)| {
            if key == DATA_DIR_OPTION && !value.is_empty() {
                let absolute = absolutize(root, Path::new(value));
                (key.clone(), absolute.to_string_lossy().into_owned())
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect();
    out.push((ADDONS_PATH_OPTION.to_string(), addons_path));
    out
}

/// Copy `template` to `destination` and apply `overrides` to its
/// `[options]` section.
pub fn render(template: &Path, destination: &Path, overrides: &Overrides) -> Result<()> {
    if !template.is_file() {
        return Err(Error::TemplateNotFound {
            path: template.to_path_buf(),
        });
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(template, destination)?;
    debug!(
        "Copied {} to {}",
        template.display(),
        destination.display()
    );

    // Values are kept verbatim: no quote stripping, no escapes, and
    // indented continuation lines belong to the value above them.
    let parse_option = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        enabled_indented_mutiline_value: true,
        ..ParseOption::default()
    };
    let mut ini = Ini::load_from_file_opt(destination, parse_option).map_err(|e| {
        Error::config(format!(
            "cannot parse configuration template {}: {}",
            template.display(),
            e
        ))
    })?;

    for (key, value) in overrides {
        ini.with_section(Some(OPTIONS_SECTION))
            .set(key.as_str(), value.as_str());
    }

    for (_, properties) in ini.iter_mut() {
        for (_, value) in properties.iter_mut() {
            if value.contains('\n') {
                *value = value.replace('\n', &format!("\n{}", CONTINUATION_INDENT));
            }
        }
    }

    ini.write_to_file_policy(destination, EscapePolicy::Nothing)?;
    Ok(())
}

/// Write an executable launcher running the framework with `config_file`.
///
/// Extra arguments given to the launcher are forwarded. The interpreter
/// can be overridden with `ODOONS_PYTHON` at run time.
pub fn write_launcher(bin_dir: &Path, odoo_path: &Path, config_file: &Path) -> Result<PathBuf> {
    fs::create_dir_all(bin_dir)?;
    let launcher = bin_dir.join(LAUNCHER_FILE);

    let script = format!(
        "#!/bin/sh\n\
        # Generated by odoons, changes will be overwritten.\n\
        exec \"${{ODOONS_PYTHON:-python3}}\" \"{}\" -c \"{}\" \"$@\"\n",
        odoo_path.join("odoo-bin").display(),
        config_file.display()
    );
    fs::write(&launcher, script)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = fs::metadata(&launcher)?.permissions();
        permissions.set_mode(permissions.mode() | 0o111);
        fs::set_permissions(&launcher, permissions)?;
    }

    Ok(launcher)
}
