//! # odoons
//!
//! Manage an Odoo project workspace from a single `odoons.yml` document:
//! clone and update the framework and its addon repositories, install their
//! Python requirements, render the runtime `odoo.cfg`, and migrate legacy
//! buildout configurations.
//!
//! ## Quick Example
//!
//! ```
//! use odoons::config::Config;
//!
//! let config = Config::parse(r#"
//! odoons:
//!   odoo:
//!     path: parts/odoo
//!     version: "14.0"
//!   addons:
//!     extra:
//!       type: local
//!       path: vendor/extra
//! "#).unwrap();
//!
//! let path = config
//!     .addons
//!     .combined_addons_path(std::path::Path::new("/work"), &config.odoo.path);
//! assert!(path.starts_with("/work/parts/odoo/odoo/addons,/work/parts/odoo/addons"));
//! assert!(path.ends_with("/work/vendor/extra"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`, `addons`)**: the project document, the
//!   framework declaration and the ordered addon registry.
//! - **Repository Synchronization (`git`)**: tracked and frozen checkouts
//!   behind a mockable `GitOperations` seam.
//! - **Requirements (`installer`)**: `pip` behind a `PackageInstaller` seam.
//! - **Runtime File (`odoo_config`)**: template rendering and the launcher.
//! - **Legacy Migration (`buildout`, `migrate`)**: reading buildout chains
//!   and converting them into a project document.
//! - **Orchestration (`workspace`)**: what each CLI command does, with
//!   per-declaration failure isolation.

pub mod addons;
pub mod buildout;
pub mod config;
pub mod error;
pub mod git;
pub mod installer;
pub mod migrate;
pub mod odoo_config;
pub mod output;
pub mod path;
pub mod workspace;
