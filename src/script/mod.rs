//! Package script loading, compilation, and registration
//!
//! `loader` turns package manifests into [`Script`] records and variable
//! pools, `compiler` resolves `{$name}` placeholders into shell-safe command
//! strings, and `manager` registers the compiled scripts into the project's
//! root script table.

mod compiler;
mod escape;
mod loader;
mod manager;
#[allow(clippy::module_inception)]
mod script;
mod value;

pub use compiler::{CompileError, ScriptCompiler};
pub use escape::{shell_escape, PosixEscaper, ShellEscaper};
pub use loader::ScriptLoader;
pub use manager::ScriptManager;
pub use script::{Definition, Script};
pub use value::Value;
