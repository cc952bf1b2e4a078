//! Initialize config use case

use crate::error::{DustpanError, Result};
use crate::infrastructure::config::{Config, CONFIG_FILE_NAME};
use std::fs;
use std::path::{Path, PathBuf};

/// Service for writing a starter `.dustpan.toml`
pub struct InitService;

impl InitService {
    /// Write the default config into `path`, creating the directory if needed
    ///
    /// Returns the path of the new file. An existing config is never
    /// overwritten.
    pub fn execute(path: &Path) -> Result<PathBuf> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        let config_path = path.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Err(DustpanError::AlreadyInitialized(config_path));
        }

        Config::with_defaults().save_to_dir(path)
    }
}
