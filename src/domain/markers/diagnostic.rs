//! Diagnostics reported while transforming a document
//!
//! Every problem the engine runs into is returned as a value. Only
//! structural errors are fatal, and even those never abort the caller.

use std::fmt;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Explains why something was left alone
    Info,
    /// A single block was skipped, the rest of the document was processed
    Warning,
    /// The whole document was left untouched
    Fatal,
}

/// Why a start tag's attributes could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeErrorReason {
    /// `to` attribute is absent or has no value
    MissingExpiry,
    /// `to` attribute does not match `YYYY-MM-DD HH:MM:SS`
    InvalidExpiry(String),
    /// Removal marker without a `name` attribute
    MissingName,
}

/// Why the tag sequence is not well nested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralErrorReason {
    /// End tag with nothing open
    UnmatchedEnd,
    /// Start tag still open at end of input
    UnclosedStart,
    /// End tag closes a start tag of a different marker kind
    MismatchedEnd { expected: String, found: String },
}

/// Why an expired unwrap-mode block was left as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    MarkerSharesLine,
    EmptyBody,
    NoShell,
    MarkerIndentedPastBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    AttributeError {
        line: usize,
        column: usize,
        reason: AttributeErrorReason,
    },
    StructuralError {
        line: usize,
        column: usize,
        reason: StructuralErrorReason,
    },
    UnwrapIneligible {
        line: usize,
        column: usize,
        reason: IneligibleReason,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::AttributeError { .. } => Severity::Warning,
            Diagnostic::StructuralError { .. } => Severity::Fatal,
            Diagnostic::UnwrapIneligible { .. } => Severity::Info,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// 1-based (line, column) of the tag this diagnostic refers to
    pub fn position(&self) -> (usize, usize) {
        match self {
            Diagnostic::AttributeError { line, column, .. }
            | Diagnostic::StructuralError { line, column, .. }
            | Diagnostic::UnwrapIneligible { line, column, .. } => (*line, *column),
        }
    }
}

impl fmt::Display for AttributeErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeErrorReason::MissingExpiry => write!(f, "missing `to` attribute"),
            AttributeErrorReason::InvalidExpiry(value) => write!(
                f,
                "invalid `to` value '{}' (expected YYYY-MM-DD HH:MM:SS)",
                value
            ),
            AttributeErrorReason::MissingName => write!(f, "missing `name` attribute"),
        }
    }
}

impl fmt::Display for StructuralErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralErrorReason::UnmatchedEnd => write!(f, "end tag without a matching start tag"),
            StructuralErrorReason::UnclosedStart => write!(f, "start tag is never closed"),
            StructuralErrorReason::MismatchedEnd { expected, found } => write!(
                f,
                "end tag '{}' does not close the open '{}' tag",
                found, expected
            ),
        }
    }
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            IneligibleReason::MarkerSharesLine => "a marker shares its line with other text",
            IneligibleReason::EmptyBody => "the block has no non-blank body line",
            IneligibleReason::NoShell => "the body needs distinct opening and closing lines",
            IneligibleReason::MarkerIndentedPastBody => {
                "the start marker is indented deeper than the body"
            }
        };
        f.write_str(msg)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, column) = self.position();
        match self {
            Diagnostic::AttributeError { reason, .. } => {
                write!(f, "{}:{}: attribute error: {}", line, column, reason)
            }
            Diagnostic::StructuralError { reason, .. } => {
                write!(f, "{}:{}: structural error: {}", line, column, reason)
            }
            Diagnostic::UnwrapIneligible { reason, .. } => {
                write!(f, "{}:{}: block kept as-is: {}", line, column, reason)
            }
        }
    }
}
