//! Registers compiled package scripts into the project's root script table

use std::collections::HashMap;
use tracing::debug;

use super::compiler::ScriptCompiler;
use super::loader::ScriptLoader;
use super::script::Script;
use super::value::Value;
use crate::error::Result;
use crate::manifest::Project;

/// Loads, compiles, and registers package scripts.
///
/// Registration is first-wins: root scripts and earlier registrations keep
/// their names; later scripts and aliases that collide stay inactive. Entries
/// registered by a previous run are cleared before the next one.
#[derive(Default)]
pub struct ScriptManager {
    loader: ScriptLoader,
    compiler: ScriptCompiler,
    /// Names and aliases this manager registered, in registration order
    registered: Vec<(String, Script)>,
    loaded: Vec<Script>,
}

impl ScriptManager {
    /// Create a manager with a default loader and compiler
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager around a preconfigured compiler (custom escaper)
    pub fn with_compiler(compiler: ScriptCompiler) -> Self {
        Self {
            compiler,
            ..Self::default()
        }
    }

    /// Load every package script, compile it, and register it into the
    /// project's root script table.
    ///
    /// The global pool is rebuilt from the root manifest's `config` table and
    /// the package pools from the loader on every run, so a changed project
    /// never reuses stale resolutions. Any compile failure aborts the whole
    /// run; no partial registrations from the failing run survive bookkeeping.
    pub fn register_scripts(&mut self, project: &mut Project) -> Result<()> {
        // clear previously registered scripts
        for (name, _) in self.registered.drain(..) {
            project.root.scripts.remove(&name);
        }
        self.loaded.clear();

        self.compiler
            .set_global_variables(project.root.config.clone());
        self.compiler.set_package_variables(
            self.loader
                .load_script_variables(&project.root, &project.packages),
        );

        self.loaded = self.loader.load_scripts(&project.packages);
        debug!("registering {} package script(s)", self.loaded.len());

        for script in &self.loaded {
            let listeners = self.compiler.compile(script)?;

            if !project.root.scripts.contains_key(&script.name) {
                project.root.scripts.insert(script.name.clone(), listeners);
                self.registered.push((script.name.clone(), script.clone()));
            }

            for alias in &script.aliases {
                if !project.root.scripts.contains_key(alias) {
                    project
                        .root
                        .scripts
                        .insert(alias.clone(), vec![format!("@{}", script.name)]);
                    self.registered.push((alias.clone(), script.clone()));
                }
            }
        }

        Ok(())
    }

    /// Names and aliases registered by the last run, with their scripts
    pub fn registered_scripts(&self) -> &[(String, Script)] {
        &self.registered
    }

    /// All scripts loaded by the last run, registered or not
    pub fn loaded_scripts(&self) -> &[Script] {
        &self.loaded
    }

    /// Package variable pools used during the last run
    pub fn package_variables(&self) -> &HashMap<String, HashMap<String, Value>> {
        self.compiler.package_variables()
    }

    /// Whether `key` (a name or alias) is registered and maps to `script`
    pub fn is_registered_as(&self, key: &str, script: &Script) -> bool {
        self.registered
            .iter()
            .any(|(name, registered)| name == key && registered == script)
    }
}
