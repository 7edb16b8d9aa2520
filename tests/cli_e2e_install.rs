//! End-to-end tests for the `install` command.
//!
//! The installer is replaced through `ODOONS_PIP` by a program that accepts
//! any arguments.

mod common;
use common::prelude::*;

#[cfg(unix)]
#[test]
fn test_install_warns_on_missing_manifest_and_continues() {
    let fixture = TestFixture::new()
        .with_config(configs::LOCAL_ONLY)
        .with_file("vendor/extra/requirements.txt", "requests\n");

    fixture
        .command()
        .env("ODOONS_PIP", "true")
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("No requirements file for odoo"))
        .stdout(predicate::str::contains("No requirements file for extra").not())
        .stdout(predicate::str::contains("No requirements file for project"));
}

#[cfg(unix)]
#[test]
fn test_install_exclude() {
    let fixture = TestFixture::new().with_config(configs::LOCAL_ONLY);

    fixture
        .command()
        .env("ODOONS_PIP", "true")
        .args(["install", "--exclude", "odoo", "extra", "project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ignoring odoo"))
        .stdout(predicate::str::contains("No requirements file").not());
}

#[cfg(unix)]
#[test]
fn test_install_failure_is_fatal() {
    let fixture = TestFixture::new()
        .with_config(configs::LOCAL_ONLY)
        .with_file("requirements.txt", "requests\n");

    fixture
        .command()
        .env("ODOONS_PIP", "false")
        .arg("install")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("exited with"));
}
