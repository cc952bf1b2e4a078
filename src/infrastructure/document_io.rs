//! Reading and writing the documents being cleaned

use crate::error::{DustpanError, Result};
use std::fs;
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

/// Where the text to transform comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Stdin,
    File(PathBuf),
}

impl DocumentSource {
    /// Name used to prefix diagnostics
    pub fn display_name(&self) -> String {
        match self {
            DocumentSource::Stdin => "<stdin>".to_string(),
            DocumentSource::File(path) => path.display().to_string(),
        }
    }

    pub fn read(&self) -> Result<String> {
        match self {
            DocumentSource::Stdin => {
                let mut stdin = std::io::stdin();
                // Refuse to block on an interactive terminal
                if stdin.is_terminal() {
                    return Err(DustpanError::NoInput);
                }
                let mut text = String::new();
                stdin.read_to_string(&mut text)?;
                Ok(text)
            }
            DocumentSource::File(path) => Ok(fs::read_to_string(path)?),
        }
    }
}

/// Where the transformed text goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSink {
    Stdout,
    File(PathBuf),
}

impl DocumentSink {
    pub fn write(&self, text: &str) -> Result<()> {
        match self {
            DocumentSink::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
                Ok(())
            }
            DocumentSink::File(path) => write_atomic(path, text),
        }
    }
}

/// Write `content` to `path` through a sibling temp file and a rename
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_name = format!(
        "{}.dustpan-tmp-{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("output"),
        std::process::id()
    );
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, content)?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(DustpanError::Io(e));
    }

    Ok(())
}
