//! Configuration management

use crate::domain::markers::settings::{
    parse_time_offset, DEFAULT_CLOSE_DELIMITER, DEFAULT_OPEN_DELIMITER,
    DEFAULT_REMOVAL_MARKER_TAG_NAME, DEFAULT_TAG_NAME,
};
use crate::domain::markers::MarkerSettings;
use crate::error::{DustpanError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up while walking towards the filesystem root
pub const CONFIG_FILE_NAME: &str = ".dustpan.toml";

/// Environment variable naming a config file explicitly
pub const CONFIG_ENV_VAR: &str = "DUSTPAN_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DelimitersSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeLimitedSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// UTC offset such as `+09:00`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemovalMarkerSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove: Option<Vec<String>>,
}

/// Contents of a `.dustpan.toml`; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub delimiters: DelimitersSection,
    pub time_limited: TimeLimitedSection,
    pub removal_marker: RemovalMarkerSection,
}

impl Config {
    /// A config with every field spelled out, as written by `dustpan init`
    pub fn with_defaults() -> Self {
        Config {
            delimiters: DelimitersSection {
                open: Some(DEFAULT_OPEN_DELIMITER.to_string()),
                close: Some(DEFAULT_CLOSE_DELIMITER.to_string()),
            },
            time_limited: TimeLimitedSection {
                tag: Some(DEFAULT_TAG_NAME.to_string()),
                offset: Some("+00:00".to_string()),
            },
            removal_marker: RemovalMarkerSection {
                tag: Some(DEFAULT_REMOVAL_MARKER_TAG_NAME.to_string()),
                remove: Some(Vec::new()),
            },
        }
    }

    /// Load config from an explicit file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DustpanError::ConfigNotFound(path.to_path_buf())
            } else {
                DustpanError::Io(e)
            }
        })?;

        toml::from_str(&contents).map_err(|e| {
            DustpanError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save config as `.dustpan.toml` in the given directory
    pub fn save_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        let contents = toml::to_string_pretty(self)
            .map_err(|e| DustpanError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, contents)?;

        Ok(config_path)
    }

    /// Find the config file that applies to the current directory
    /// First checks DUSTPAN_CONFIG environment variable, then walks up
    pub fn locate() -> Result<Option<PathBuf>> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = PathBuf::from(explicit);
            if path.is_file() {
                return Ok(Some(path));
            }
            return Err(DustpanError::ConfigNotFound(path));
        }

        let current_dir = std::env::current_dir()?;
        Ok(Self::locate_from(&current_dir))
    }

    /// Walk up from `start` looking for `.dustpan.toml`
    pub fn locate_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load the config that applies here, or the defaults if there is none
    pub fn discover() -> Result<Self> {
        match Self::locate()? {
            Some(path) => {
                log::info!("using config {}", path.display());
                Self::load_from_path(&path)
            }
            None => {
                log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                Ok(Config::default())
            }
        }
    }

    /// Overlay this config on the built-in marker settings
    pub fn to_settings(&self) -> Result<MarkerSettings> {
        let mut settings = MarkerSettings::default();

        if let Some(open) = &self.delimiters.open {
            settings.delimiters.open = open.clone();
        }
        if let Some(close) = &self.delimiters.close {
            settings.delimiters.close = close.clone();
        }
        if let Some(tag) = &self.time_limited.tag {
            settings.tag_name = tag.clone();
        }
        if let Some(offset) = &self.time_limited.offset {
            settings.time_offset = parse_time_offset(offset)
                .ok_or_else(|| DustpanError::InvalidTimeOffset(offset.clone()))?;
        }
        if let Some(tag) = &self.removal_marker.tag {
            settings.removal_marker.tag_name = tag.clone();
        }
        if let Some(names) = &self.removal_marker.remove {
            settings.removal_marker.names.extend(names.iter().cloned());
        }

        validate(&settings)?;
        Ok(settings)
    }
}

/// Reject settings that could never match a marker
pub fn validate(settings: &MarkerSettings) -> Result<()> {
    if settings.delimiters.open.is_empty() || settings.delimiters.close.is_empty() {
        return Err(DustpanError::Config(
            "comment delimiters must not be empty".to_string(),
        ));
    }
    if settings.tag_name.trim().is_empty() || settings.removal_marker.tag_name.trim().is_empty() {
        return Err(DustpanError::Config("tag names must not be empty".to_string()));
    }
    if settings.tag_name == settings.removal_marker.tag_name {
        return Err(DustpanError::Config(format!(
            "time-limited and removal-marker tags are both named '{}'",
            settings.tag_name
        )));
    }
    Ok(())
}
