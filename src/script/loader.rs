//! Loads script records and variable pools from package manifests

use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::script::{Definition, Script};
use super::value::Value;
use crate::manifest::{PackageManifest, RootManifest};

/// Derives [`Script`] records and variable pools from package metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptLoader;

impl ScriptLoader {
    /// Load the scripts of every installed package, in package order.
    ///
    /// Fully-qualified names prefix the short name with the package name,
    /// `/` replaced by `:`. Listeners referencing a sibling script as
    /// `@short-name` are rewritten to its fully-qualified form; any other
    /// `@` reference passes through untouched.
    pub fn load_scripts(&self, packages: &[PackageManifest]) -> Vec<Script> {
        let mut scripts = Vec::new();

        for package in packages {
            if package.extra.scripts.is_empty() {
                continue;
            }

            let names = resolve_script_names(&package.name, &package.extra.scripts);
            debug!(
                "loading {} script(s) from {}",
                package.extra.scripts.len(),
                package.name
            );

            for (short_name, definition) in &package.extra.scripts {
                let name = names[short_name].clone();
                let meta = package.extra.scripts_meta.get(short_name);

                let aliases = meta.map(|meta| meta.aliases.to_vec()).unwrap_or_default();
                let help = meta.and_then(|meta| meta.help.clone()).unwrap_or_else(|| {
                    format!("Run the \"{}\" script from {}", short_name, package.name)
                });

                let definition = match definition {
                    Definition::Single(listener) => {
                        Definition::Single(resolve_listener(&names, listener))
                    }
                    Definition::Many(listeners) => Definition::Many(
                        listeners
                            .iter()
                            .map(|listener| resolve_listener(&names, listener))
                            .collect(),
                    ),
                };

                scripts.push(Script {
                    package: package.name.clone(),
                    short_name: short_name.clone(),
                    name,
                    aliases,
                    definition,
                    help,
                });
            }
        }

        scripts
    }

    /// Build the package variable pools, applying root-manifest overrides.
    ///
    /// Root overrides only apply to packages that are actually installed;
    /// per variable, the root value wins.
    pub fn load_script_variables(
        &self,
        root: &RootManifest,
        packages: &[PackageManifest],
    ) -> HashMap<String, HashMap<String, Value>> {
        let mut variables: HashMap<String, HashMap<String, Value>> = packages
            .iter()
            .map(|package| (package.name.clone(), package.extra.script_vars.clone()))
            .collect();

        for (package_name, overrides) in &root.extra.script_vars {
            if let Some(pool) = variables.get_mut(package_name) {
                for (name, value) in overrides {
                    pool.insert(name.clone(), value.clone());
                }
            }
        }

        variables
    }
}

/// Map each short name to its fully-qualified form
fn resolve_script_names(
    package_name: &str,
    scripts: &BTreeMap<String, Definition>,
) -> BTreeMap<String, String> {
    let prefix = format!("{}:", package_name.replace('/', ":"));

    scripts
        .keys()
        .map(|short_name| (short_name.clone(), format!("{prefix}{short_name}")))
        .collect()
}

/// Rewrite `@short-name` references to sibling scripts of the same package
fn resolve_listener(names: &BTreeMap<String, String>, listener: &str) -> String {
    if let Some(reference) = listener.strip_prefix('@') {
        if let Some(name) = names.get(reference) {
            return format!("@{name}");
        }
    }

    listener.to_string()
}
