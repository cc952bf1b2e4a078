//! Output formatting utilities

use crate::domain::markers::{Diagnostic, Severity};

/// Format diagnostics for stderr, one per line, prefixed with the input name
///
/// Fatal diagnostics are left out; they surface as the run's error instead.
/// With `quiet` nothing else is printed either.
pub fn format_diagnostics(name: &str, diagnostics: &[Diagnostic], quiet: bool) -> String {
    if quiet {
        return String::new();
    }

    let mut output = String::new();
    for diagnostic in diagnostics {
        let label = match diagnostic.severity() {
            Severity::Fatal => continue,
            Severity::Warning => "warning",
            Severity::Info => "note",
        };
        output.push_str(&format!("{}: {}:{}\n", label, name, diagnostic));
    }
    output
}
