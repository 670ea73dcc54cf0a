//! Host-boundary project metadata
//!
//! The host package manager supplies a project description: the root manifest
//! (whose `config` table doubles as the global variable pool and whose
//! `scripts` table receives registered scripts) plus the installed package
//! manifests carrying script and variable definitions under `extra`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::script::{Definition, Value};

/// A loaded project: root manifest plus installed packages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    /// The root package manifest
    #[serde(default)]
    pub root: RootManifest,
    /// Installed package manifests, in installation order
    #[serde(default)]
    pub packages: Vec<PackageManifest>,
}

impl Project {
    /// Load a project metadata file (JSON)
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// The root package manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RootManifest {
    #[serde(default)]
    pub name: String,
    /// Host configuration table, used as the global variable pool
    #[serde(default)]
    pub config: HashMap<String, Value>,
    /// Root script table that package scripts are registered into
    #[serde(default)]
    pub scripts: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub extra: RootExtra,
}

/// Root-manifest `extra` keys consumed by the loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RootExtra {
    /// Per-package variable overrides; a root value wins over the package's own
    #[serde(rename = "package-scripts-vars", default)]
    pub script_vars: HashMap<String, HashMap<String, Value>>,
}

/// An installed package manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    #[serde(default)]
    pub extra: PackageExtra,
}

/// Package-manifest `extra` keys consumed by the loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageExtra {
    /// Script definitions keyed by short name
    #[serde(rename = "package-scripts", default)]
    pub scripts: BTreeMap<String, Definition>,
    /// Aliases and help text keyed by short name
    #[serde(rename = "package-scripts-meta", default)]
    pub scripts_meta: BTreeMap<String, ScriptMeta>,
    /// The package's variable pool
    #[serde(rename = "package-scripts-vars", default)]
    pub script_vars: HashMap<String, Value>,
}

/// Optional metadata attached to one script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptMeta {
    #[serde(default)]
    pub aliases: Aliases,
    #[serde(default)]
    pub help: Option<String>,
}

/// Alias names, written as a single string or a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Aliases {
    /// A single alias
    One(String),
    /// Zero or more aliases
    Many(Vec<String>),
}

impl Default for Aliases {
    fn default() -> Self {
        Aliases::Many(Vec::new())
    }
}

impl Aliases {
    /// Normalize to a list of alias names
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Aliases::One(alias) => vec![alias.clone()],
            Aliases::Many(aliases) => aliases.clone(),
        }
    }
}
