//! Operator-facing commands over a project metadata file
//!
//! `list` shows the registered package scripts (and the ones that lost a name
//! conflict); `dump` prints the compiled root script table or the package
//! variable pools.

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::manifest::Project;
use crate::script::{Script, ScriptManager};

/// List available package scripts, then any inactive ones.
pub fn run_list(project_path: &Path, verbose: bool) -> Result<()> {
    let (manager, _project) = register(project_path)?;

    println!("Available package scripts:");

    // unique scripts, aliases excluded, sorted by name
    let mut unique: BTreeMap<&str, &Script> = BTreeMap::new();
    for (key, script) in manager.registered_scripts() {
        if key == &script.name {
            unique.insert(script.name.as_str(), script);
        }
    }

    for script in unique.values() {
        let active_aliases: Vec<&str> = script
            .aliases
            .iter()
            .filter(|alias| manager.is_registered_as(alias, script))
            .map(String::as_str)
            .collect();

        let alias_list = if active_aliases.is_empty() || verbose {
            String::new()
        } else {
            format!(" ({})", active_aliases.join(", "))
        };

        println!(" {}{}  {}", script.name, alias_list, script.help);

        if verbose {
            println!("   - package: {}", script.package);
            println!(
                "   - definition: {}",
                serde_json::to_string(&script.definition)?
            );
            println!("   - aliases: {}", active_aliases.join(", "));
        }
    }

    let inactive = inactive_entries(&manager);

    if !inactive.is_empty() {
        println!();
        println!("Inactive package scripts:");

        for entry in &inactive {
            match entry {
                Inactive::Script(script) => {
                    println!(" {}  script \"{}\"", script.package, script.name)
                }
                Inactive::Alias { alias, script } => println!(
                    " {}  alias \"{}\" of \"{}\"",
                    script.package, alias, script.name
                ),
            }
        }

        println!();
        println!(
            "Package script or alias is inactive if it conflicts with \
             another package script, alias or a root script."
        );
    }

    Ok(())
}

/// Dump the compiled root script table, or the package variable pools.
pub fn run_dump(project_path: &Path, vars: bool) -> Result<()> {
    let (manager, project) = register(project_path)?;

    let value = if vars {
        serde_json::to_value(manager.package_variables())?
    } else {
        serde_json::to_value(&project.root.scripts)?
    };

    dump(&value, 0);
    Ok(())
}

fn register(project_path: &Path) -> Result<(ScriptManager, Project)> {
    debug!("loading project metadata from {}", project_path.display());
    let mut project = Project::load(project_path).with_context(|| {
        format!(
            "failed to load project metadata from {}",
            project_path.display()
        )
    })?;

    let mut manager = ScriptManager::new();
    manager.register_scripts(&mut project)?;
    Ok((manager, project))
}

enum Inactive<'a> {
    Script(&'a Script),
    Alias { alias: &'a str, script: &'a Script },
}

/// Loaded scripts and aliases that lost a name conflict
fn inactive_entries(manager: &ScriptManager) -> Vec<Inactive<'_>> {
    let mut inactive = Vec::new();

    for script in manager.loaded_scripts() {
        if !manager.is_registered_as(&script.name, script) {
            inactive.push(Inactive::Script(script));
        }

        for alias in &script.aliases {
            if !manager.is_registered_as(alias, script) {
                inactive.push(Inactive::Alias { alias, script });
            }
        }
    }

    inactive
}

/// Print a value as indented `key:` / value lines
fn dump(value: &JsonValue, level: usize) {
    match value {
        JsonValue::Array(items) => {
            if items.is_empty() {
                print!("[]");
            }
            if level > 0 {
                println!();
            }
            for (index, item) in items.iter().enumerate() {
                print!("{}{}: ", "    ".repeat(level), index);
                dump(item, level + 1);
            }
        }
        JsonValue::Object(map) => {
            if map.is_empty() {
                print!("[]");
            }
            if level > 0 {
                println!();
            }
            for (key, item) in map {
                print!("{}{}: ", "    ".repeat(level), key);
                dump(item, level + 1);
            }
        }
        JsonValue::Null => println!(),
        JsonValue::String(text) => println!("{text}"),
        scalar => println!("{scalar}"),
    }
}
