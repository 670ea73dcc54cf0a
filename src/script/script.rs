//! Script records produced by the loader and consumed by the compiler

use serde::{Deserialize, Serialize};

/// A script definition: one command string or an ordered list of them.
///
/// Each command string is one "listener" in the host's script table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Definition {
    /// A single command string
    Single(String),
    /// An ordered list of command strings
    Many(Vec<String>),
}

impl Definition {
    /// Normalize to an ordered sequence of listener strings
    pub fn listeners(&self) -> &[String] {
        match self {
            Definition::Single(listener) => std::slice::from_ref(listener),
            Definition::Many(listeners) => listeners,
        }
    }
}

impl From<&str> for Definition {
    fn from(listener: &str) -> Self {
        Definition::Single(listener.to_string())
    }
}

impl From<Vec<&str>> for Definition {
    fn from(listeners: Vec<&str>) -> Self {
        Definition::Many(listeners.into_iter().map(String::from).collect())
    }
}

/// An immutable package script record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Name of the package that owns this script
    pub package: String,
    /// Short name within the owning package
    pub short_name: String,
    /// Fully-qualified name (package prefix + short name)
    pub name: String,
    /// Alias names requested by the package metadata
    pub aliases: Vec<String>,
    /// Raw command definition, placeholders not yet resolved
    pub definition: Definition,
    /// Operator-facing help text
    pub help: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_definition_normalizes_to_one_listener() {
        let definition = Definition::from("echo foo");
        assert_eq!(definition.listeners(), ["echo foo".to_string()]);
    }

    #[test]
    fn test_many_definition_preserves_order() {
        let definition = Definition::from(vec!["echo a", "echo b"]);
        assert_eq!(
            definition.listeners(),
            ["echo a".to_string(), "echo b".to_string()]
        );
    }

    #[test]
    fn test_empty_definition_has_no_listeners() {
        let definition = Definition::Many(vec![]);
        assert!(definition.listeners().is_empty());
    }
}
