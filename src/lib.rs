//! # pkg-scripts
//!
//! Lets installed packages register named, shell-executable scripts with the
//! host package manager, with reusable variables resolved across package and
//! global scopes.
//!
//! ## Modules
//!
//! - `cli` - `list` and `dump` commands over a project metadata file
//! - `error` - crate error type and `Result` alias
//! - `manifest` - host-boundary project metadata (root + package manifests)
//! - `script` - script loading, variable compilation, and registration

pub mod cli;
pub mod error;
pub mod manifest;
pub mod script;

pub use error::{Error, Result};
