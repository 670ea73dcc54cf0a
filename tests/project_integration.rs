//! End-to-end tests: project metadata file -> loader -> compiler -> root
//! script table

use std::io::Write;

use pkg_scripts::manifest::Project;
use pkg_scripts::script::{ScriptCompiler, ScriptManager};

fn project_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn deterministic_manager() -> ScriptManager {
    let mut compiler = ScriptCompiler::new();
    compiler.set_escaper(|arg: &str| format!("\"{}\"", arg.replace('"', "\\\"")));
    ScriptManager::with_compiler(compiler)
}

const PROJECT: &str = r#"{
    "root": {
        "name": "acme/root",
        "config": {"bin-dir": "vendor/bin"},
        "scripts": {"deploy": ["echo root deploy"]},
        "extra": {
            "package-scripts-vars": {
                "acme/tools": {"flags": ["-v", "--ansi"]}
            }
        }
    },
    "packages": [
        {
            "name": "acme/tools",
            "extra": {
                "package-scripts": {
                    "lint": "{$bin-dir}/linter {$flags} {$targets}",
                    "fix": ["@lint", "echo fixed"]
                },
                "package-scripts-meta": {
                    "lint": {"aliases": "lint", "help": "Run the linter"}
                },
                "package-scripts-vars": {
                    "flags": ["-q"],
                    "targets": ["src", "tests"]
                }
            }
        }
    ]
}"#;

#[test]
fn test_full_pipeline_compiles_and_registers() {
    let file = project_file(PROJECT);
    let mut project = Project::load(file.path()).unwrap();
    let mut manager = deterministic_manager();

    manager.register_scripts(&mut project).unwrap();

    // variables resolve through the package -> global fallback, root
    // overrides win, and lists expand to escaped tokens
    assert_eq!(
        project.root.scripts["acme:tools:lint"],
        ["\"vendor/bin\"/linter \"-v\" \"--ansi\" \"src\" \"tests\""]
    );

    // sibling @-references were qualified by the loader
    assert_eq!(
        project.root.scripts["acme:tools:fix"],
        ["@acme:tools:lint", "echo fixed"]
    );

    // alias indirection plus untouched root scripts
    assert_eq!(project.root.scripts["lint"], ["@acme:tools:lint"]);
    assert_eq!(project.root.scripts["deploy"], ["echo root deploy"]);
}

#[test]
fn test_reregistration_after_pool_change_uses_fresh_values() {
    let file = project_file(PROJECT);
    let mut project = Project::load(file.path()).unwrap();
    let mut manager = deterministic_manager();

    manager.register_scripts(&mut project).unwrap();
    let before = project.root.scripts["acme:tools:lint"].clone();

    project
        .root
        .config
        .insert("bin-dir".to_string(), "other/bin".into());
    manager.register_scripts(&mut project).unwrap();

    assert_ne!(project.root.scripts["acme:tools:lint"], before);
    assert_eq!(
        project.root.scripts["acme:tools:lint"],
        ["\"other/bin\"/linter \"-v\" \"--ansi\" \"src\" \"tests\""]
    );
}

#[test]
fn test_compile_failure_aborts_registration() {
    let file = project_file(
        r#"{
            "root": {"name": "acme/root"},
            "packages": [
                {
                    "name": "acme/bad",
                    "extra": {
                        "package-scripts": {"run": "echo {$var}"},
                        "package-scripts-vars": {
                            "var": "prefix {$list} suffix",
                            "list": ["a", "b"]
                        }
                    }
                }
            ]
        }"#,
    );

    let mut project = Project::load(file.path()).unwrap();
    let mut manager = deterministic_manager();

    let err = manager.register_scripts(&mut project).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Script compiler error: Failed to compile package script variable \
         [acme/bad][var] - Cannot embed list variable [list]"
    );
    assert!(!project.root.scripts.contains_key("acme:bad:run"));
}
