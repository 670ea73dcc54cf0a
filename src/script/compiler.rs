//! Script compilation engine
//!
//! Resolves `{$name}` placeholders in script listeners against a per-package
//! and a global variable pool, then escapes the substituted values for shell
//! consumption. Resolution is memoized per `(package, variable)` and guarded
//! against circular references by an ordered set of in-flight names.
//!
//! Lookup order for any name is package pool, then global pool, then the
//! empty-string scalar. A list value may only be reached through a direct
//! reference (a scalar that is exactly one placeholder); embedding one inside
//! larger text is an error. At the listener level a list always expands to
//! space-joined, individually escaped tokens.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

use super::escape::{PosixEscaper, ShellEscaper};
use super::script::Script;
use super::value::Value;

/// Matches every `{$name}` placeholder occurrence inside text
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\$([^}]+)\}").expect("Invalid regex pattern"));

/// Matches a scalar whose entire text is exactly one placeholder
static DIRECT_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{\$([^}]+)\}$").expect("Invalid regex pattern"));

/// Errors raised while compiling a script's variables.
#[derive(Error, Debug)]
pub enum CompileError {
    /// A variable directly or transitively references itself
    #[error(
        "Circular reference to package script variable [{variable}] detected at [{package}][{}]",
        .chain.join("][")
    )]
    CircularReference {
        /// Package whose pool the resolution ran in
        package: String,
        /// The variable that closed the cycle
        variable: String,
        /// Names visited along the resolution chain, in first-visit order
        chain: Vec<String>,
    },

    /// A list value was substituted inside scalar text that is not a pure
    /// direct reference
    #[error("Cannot embed list variable [{variable}]")]
    EmbeddedList {
        /// The offending variable name
        variable: String,
    },

    /// A nested resolution failure, re-raised with the variable it occurred in
    #[error("Failed to compile package script variable [{package}][{variable}] - {source}")]
    Resolve {
        /// Package whose pool the resolution ran in
        package: String,
        /// The variable whose raw value caused the failure
        variable: String,
        /// The underlying failure
        #[source]
        source: Box<CompileError>,
    },
}

/// Compiles script listeners by resolving and escaping their variables.
pub struct ScriptCompiler {
    global_variables: HashMap<String, Value>,
    package_variables: HashMap<String, HashMap<String, Value>>,
    /// Memoized resolutions, keyed by (package, variable)
    cache: HashMap<(String, String), Value>,
    escaper: Box<dyn ShellEscaper>,
}

impl Default for ScriptCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptCompiler {
    /// Create a compiler with empty pools and the POSIX escaper
    pub fn new() -> Self {
        Self {
            global_variables: HashMap::new(),
            package_variables: HashMap::new(),
            cache: HashMap::new(),
            escaper: Box::new(PosixEscaper),
        }
    }

    /// The global variable pool
    pub fn global_variables(&self) -> &HashMap<String, Value> {
        &self.global_variables
    }

    /// Replace the global pool. Clears all memoized resolutions.
    pub fn set_global_variables(&mut self, variables: HashMap<String, Value>) {
        self.global_variables = variables;
        self.cache.clear();
    }

    /// The per-package variable pools
    pub fn package_variables(&self) -> &HashMap<String, HashMap<String, Value>> {
        &self.package_variables
    }

    /// Replace the package pools. Clears all memoized resolutions.
    pub fn set_package_variables(&mut self, variables: HashMap<String, HashMap<String, Value>>) {
        self.package_variables = variables;
        self.cache.clear();
    }

    /// Inject a different escaping strategy
    pub fn set_escaper(&mut self, escaper: impl ShellEscaper + 'static) {
        self.escaper = Box::new(escaper);
    }

    /// Compile every listener of a script into a fully substituted, escaped
    /// command string, in definition order.
    pub fn compile(&mut self, script: &Script) -> Result<Vec<String>, CompileError> {
        debug!("compiling script {}", script.name);

        script
            .definition
            .listeners()
            .iter()
            .map(|listener| self.compile_listener(&script.package, listener))
            .collect()
    }

    /// Substitute every placeholder in one listener string.
    ///
    /// Lists are legal here regardless of position: they expand to
    /// space-joined escaped tokens. Literal text passes through verbatim.
    fn compile_listener(&mut self, package: &str, listener: &str) -> Result<String, CompileError> {
        let mut compiled = String::new();
        let mut last_end = 0;

        for cap in PLACEHOLDER.captures_iter(listener) {
            let placeholder = cap.get(0).unwrap();
            let name = &cap[1];

            compiled.push_str(&listener[last_end..placeholder.start()]);

            let mut visited = Vec::new();
            let value = match self.resolve_package_variable(package, name, &mut visited)? {
                Some(value) => value,
                None => self
                    .global_variables
                    .get(name)
                    .cloned()
                    .unwrap_or_else(Value::empty),
            };

            compiled.push_str(&self.escape_value(&value));
            last_end = placeholder.end();
        }

        compiled.push_str(&listener[last_end..]);
        Ok(compiled)
    }

    /// Escape one resolved value; lists become space-joined escaped tokens
    fn escape_value(&self, value: &Value) -> String {
        match value {
            Value::Scalar(text) => self.escaper.escape(text),
            Value::List(items) => items
                .iter()
                .map(|item| self.escape_value(item))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Resolve one variable from the package's own pool.
    ///
    /// Returns `Ok(None)` when the package pool has no such variable; falling
    /// back to the global pool is the caller's responsibility. Completed
    /// resolutions are memoized; failures are not.
    fn resolve_package_variable(
        &mut self,
        package: &str,
        variable: &str,
        visited: &mut Vec<String>,
    ) -> Result<Option<Value>, CompileError> {
        let key = (package.to_string(), variable.to_string());

        if let Some(value) = self.cache.get(&key) {
            trace!("cache hit for [{package}][{variable}]");
            return Ok(Some(value.clone()));
        }

        let Some(raw) = self
            .package_variables
            .get(package)
            .and_then(|pool| pool.get(variable))
            .cloned()
        else {
            return Ok(None);
        };

        if visited.iter().any(|name| name == variable) {
            return Err(CompileError::CircularReference {
                package: package.to_string(),
                variable: variable.to_string(),
                chain: visited.clone(),
            });
        }

        visited.push(variable.to_string());
        let result = self.resolve_value(package, &raw, visited);
        visited.pop();

        match result {
            Ok(value) => {
                self.cache.insert(key, value.clone());
                Ok(Some(value))
            }
            Err(err @ CompileError::EmbeddedList { .. }) => Err(CompileError::Resolve {
                package: package.to_string(),
                variable: variable.to_string(),
                source: Box::new(err),
            }),
            Err(err) => Err(err),
        }
    }

    /// Resolve one raw value within a package scope.
    ///
    /// Lists resolve element-wise with in-place flattening. A direct
    /// reference is type-preserving and the only position where a list may
    /// surface; every other placeholder must coerce to scalar text.
    fn resolve_value(
        &mut self,
        package: &str,
        raw: &Value,
        visited: &mut Vec<String>,
    ) -> Result<Value, CompileError> {
        let text = match raw {
            Value::List(items) => {
                let mut resolved = Vec::new();

                for item in items {
                    match self.resolve_value(package, item, visited)? {
                        Value::List(inner) => resolved.extend(inner),
                        scalar => resolved.push(scalar),
                    }
                }

                return Ok(Value::List(resolved));
            }
            Value::Scalar(text) => text,
        };

        if let Some(cap) = DIRECT_REFERENCE.captures(text) {
            let name = &cap[1];

            if let Some(value) = self.resolve_package_variable(package, name, visited)? {
                return Ok(value);
            }

            let Some(global_raw) = self.global_variables.get(name).cloned() else {
                return Ok(Value::empty());
            };

            // Global values may themselves contain placeholders. The visited
            // set is threaded through so cyclic globals terminate.
            if visited.iter().any(|seen| seen == name) {
                return Err(CompileError::CircularReference {
                    package: package.to_string(),
                    variable: name.to_string(),
                    chain: visited.clone(),
                });
            }

            visited.push(name.to_string());
            let value = self.resolve_value(package, &global_raw, visited);
            visited.pop();

            return value;
        }

        let mut result = String::new();
        let mut last_end = 0;

        for cap in PLACEHOLDER.captures_iter(text) {
            let placeholder = cap.get(0).unwrap();
            let name = &cap[1];

            result.push_str(&text[last_end..placeholder.start()]);

            // Unlike the direct-reference case, a global fallback here is
            // substituted as raw text
            let value = match self.resolve_package_variable(package, name, visited)? {
                Some(value) => value,
                None => self
                    .global_variables
                    .get(name)
                    .cloned()
                    .unwrap_or_else(Value::empty),
            };

            match value {
                Value::List(_) => {
                    return Err(CompileError::EmbeddedList {
                        variable: name.to_string(),
                    })
                }
                Value::Scalar(resolved) => result.push_str(&resolved),
            }

            last_end = placeholder.end();
        }

        result.push_str(&text[last_end..]);
        Ok(Value::Scalar(result))
    }
}
