//! Shared test utilities for E2E tests.
//!
//! This module provides common fixtures and configuration snippets to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_config(configs::LOCAL_ONLY);
//!     fixture.command().arg("addons").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common configuration documents for testing.
#[allow(dead_code)]
pub mod configs {
    /// Framework plus one local addon; no git addons.
    pub const LOCAL_ONLY: &str = r#"
odoons:
  odoo:
    path: parts/odoo
    version: "14.0"
    options:
      data_dir: data
  addons:
    extra:
      type: local
      path: vendor/extra
  options:
    install-odoo-command: false
"#;

    /// Framework plus a tracked, a frozen and a local addon.
    pub const MIXED: &str = r#"
odoons:
  odoo:
    path: parts/odoo
    version: "14.0"
  addons:
    web:
      type: git
      url: https://github.com/OCA/web.git
      path: parts/web
      branch: "14.0"
    tools:
      type: git
      url: https://github.com/OCA/server-tools.git
      path: parts/server-tools
      commit: 0123456789abcdef0123456789abcdef01234567
    extra:
      type: local
      path: vendor/extra
"#;

    /// Document without the `odoo` section.
    pub const MISSING_ODOO: &str = r#"
odoons:
  addons: {}
"#;

    /// Minimal runtime configuration template.
    pub const TEMPLATE: &str = "[options]\nadmin_passwd = admin\ndb_host = localhost\n";
}

/// A test fixture that provides a temporary project directory.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_config(configs::LOCAL_ONLY)
///     .with_file("odoo.cfg.template", configs::TEMPLATE);
///
/// fixture.command().arg("config").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add an `odoons.yml` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("odoons.yml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Create an empty directory.
    #[allow(dead_code)]
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory, with
    /// colors disabled.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("odoons");
        cmd.current_dir(self.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_config() {
        let fixture = TestFixture::new().with_config(configs::LOCAL_ONLY);
        assert!(fixture.path().join("odoons.yml").exists());
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        for config in [configs::LOCAL_ONLY, configs::MIXED, configs::MISSING_ODOO] {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
    }
}
