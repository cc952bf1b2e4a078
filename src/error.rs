//! Error types for dustpan

use crate::domain::markers::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dustpan
///
/// Problems inside a document are reported as [`Diagnostic`]s; this type
/// covers everything around the document (I/O, configuration, arguments).
#[derive(Debug, Error)]
pub enum DustpanError {
    #[error("Invalid reference instant: {0}")]
    InvalidReferenceInstant(String),

    #[error("Invalid time offset: {0}")]
    InvalidTimeOffset(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file already exists: {0}")]
    AlreadyInitialized(PathBuf),

    #[error("No input: pass a file or pipe text on stdin")]
    NoInput,

    #[error("Structural error in {name}: {diagnostic}")]
    Structural { name: String, diagnostic: Diagnostic },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl DustpanError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DustpanError::Config(_)
            | DustpanError::ConfigNotFound(_)
            | DustpanError::InvalidTimeOffset(_)
            | DustpanError::TomlDeserialize(_)
            | DustpanError::TomlSerialize(_) => 2,
            DustpanError::InvalidReferenceInstant(_) => 3,
            DustpanError::Structural { .. } => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            DustpanError::InvalidReferenceInstant(input) => {
                format!(
                    "Invalid reference instant: '{}'\n\n\
                    Valid reference instants:\n\
                    • now, today, yesterday, tomorrow\n\
                    • A date: YYYY-MM-DD (start of that day)\n\
                    • A wall-clock time: YYYY-MM-DD HH:MM:SS (read at --time-offset)\n\
                    • RFC 3339: 2024-01-01T00:00:00Z\n\n\
                    Examples:\n\
                    dustpan --current tomorrow src/app.js\n\
                    dustpan --current '2024-01-01 00:00:00' src/app.js",
                    input
                )
            }
            DustpanError::InvalidTimeOffset(input) => {
                format!(
                    "Invalid time offset: '{}'\n\n\
                    Expected format: +HH:MM or -HH:MM (or Z / UTC)\n\
                    Example: dustpan --time-offset +09:00 src/app.js",
                    input
                )
            }
            DustpanError::ConfigNotFound(path) => {
                format!(
                    "Config file not found: {}\n\n\
                    Suggestions:\n\
                    • Run 'dustpan init' to create a .dustpan.toml\n\
                    • Check the path given to --config\n\
                    • Unset DUSTPAN_CONFIG to fall back to discovery",
                    path.display()
                )
            }
            DustpanError::AlreadyInitialized(path) => {
                format!(
                    "Config file already exists: {}\n\n\
                    Edit it directly or delete it before running 'dustpan init' again.",
                    path.display()
                )
            }
            DustpanError::NoInput => "No input: pass a file or pipe text on stdin\n\n\
                Examples:\n\
                dustpan src/app.js\n\
                cat src/app.js | dustpan"
                .to_string(),
            DustpanError::Structural { name, diagnostic } => {
                format!(
                    "Structural error in {}: {}\n\n\
                    The file was left unchanged.\n\
                    Suggestions:\n\
                    • Every start tag needs a matching end tag of the same kind\n\
                    • Nested blocks must close before their parent does",
                    name, diagnostic
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using DustpanError
pub type Result<T> = std::result::Result<T, DustpanError>;
