//! Shell argument escaping strategies
//!
//! Native shell escaping is platform-dependent, so the compiler takes the
//! escaper as an injectable strategy. The default quotes for POSIX shells;
//! tests inject a deterministic double-quote escaper instead.

/// Strategy converting one resolved scalar into a shell-safe token.
pub trait ShellEscaper {
    /// Escape a single argument for shell consumption
    fn escape(&self, arg: &str) -> String;
}

impl<F> ShellEscaper for F
where
    F: Fn(&str) -> String,
{
    fn escape(&self, arg: &str) -> String {
        self(arg)
    }
}

/// Default POSIX single-quote escaper.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixEscaper;

impl ShellEscaper for PosixEscaper {
    fn escape(&self, arg: &str) -> String {
        shell_escape(arg)
    }
}

/// Escape a string for safe use in POSIX shell commands
pub fn shell_escape(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    // Check if escaping is needed
    if s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' || c == '/')
    {
        return s.to_string();
    }

    // Escape single quotes by ending quote, adding escaped quote, and starting new quote
    let escaped = s.replace('\'', "'\\''");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_escape() {
        assert_eq!(shell_escape("simple"), "simple");
        assert_eq!(shell_escape("with spaces"), "'with spaces'");
        assert_eq!(shell_escape("with'quote"), "'with'\\''quote'");
        assert_eq!(shell_escape(""), "''");
    }

    #[test]
    fn test_posix_escaper_matches_free_function() {
        let escaper = PosixEscaper;
        assert_eq!(escaper.escape("a b"), shell_escape("a b"));
    }

    #[test]
    fn test_closure_escaper() {
        let escaper = |arg: &str| format!("\"{}\"", arg.replace('"', "\\\""));
        assert_eq!(escaper.escape("say \"hi\""), "\"say \\\"hi\\\"\"");
    }
}
