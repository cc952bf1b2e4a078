//! Clean document use case
//!
//! Reads one document, removes or unwraps every block that is due and writes
//! the result to the chosen destination.

use crate::domain::markers::{self, Diagnostic, MarkerSettings};
use crate::domain::ReferenceInstant;
use crate::error::Result;
use crate::infrastructure::{Config, DocumentSink, DocumentSource};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub delimiter_start: Option<String>,
    pub delimiter_end: Option<String>,
    pub tag_name: Option<String>,
    pub time_offset: Option<String>,
    pub marker_tag_name: Option<String>,
    /// Added to the names listed in the config file
    pub remove_markers: Vec<String>,
}

impl SettingsOverrides {
    /// Overlay these values on `config`, field by field
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(open) = &self.delimiter_start {
            config.delimiters.open = Some(open.clone());
        }
        if let Some(close) = &self.delimiter_end {
            config.delimiters.close = Some(close.clone());
        }
        if let Some(tag) = &self.tag_name {
            config.time_limited.tag = Some(tag.clone());
        }
        if let Some(offset) = &self.time_offset {
            config.time_limited.offset = Some(offset.clone());
        }
        if let Some(tag) = &self.marker_tag_name {
            config.removal_marker.tag = Some(tag.clone());
        }
        if !self.remove_markers.is_empty() {
            config
                .removal_marker
                .remove
                .get_or_insert_with(Vec::new)
                .extend(self.remove_markers.iter().cloned());
        }
    }
}

/// Build marker settings from an explicit or discovered config plus overrides
pub fn resolve_settings(
    config_path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<MarkerSettings> {
    let mut config = match config_path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::discover()?,
    };

    overrides.apply_to(&mut config);

    config.to_settings()
}

/// Options for one clean run
#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub source: DocumentSource,
    pub sink: DocumentSink,
    /// Instant expiry is judged against
    pub reference: ReferenceInstant,
}

/// Outcome of a clean run
#[derive(Debug, Clone)]
pub struct CleanReport {
    /// Display name of the input, used to prefix diagnostics
    pub name: String,
    pub diagnostics: Vec<Diagnostic>,
    pub changed: bool,
}

impl CleanReport {
    /// The structural error that left the document untouched, if any
    pub fn fatal(&self) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.is_fatal())
    }
}

/// Service for cleaning documents
pub struct CleanService {
    settings: MarkerSettings,
}

impl CleanService {
    pub fn new(settings: MarkerSettings) -> Self {
        CleanService { settings }
    }

    /// Execute the clean
    ///
    /// `now` is the caller's clock reading; it only matters when the
    /// reference instant is relative.
    ///
    /// The output is written even when the document has a structural error,
    /// in which case it is the input unchanged. An in-place run leaves the
    /// file alone when nothing changed.
    pub fn execute(&self, options: &CleanOptions, now: DateTime<Utc>) -> Result<CleanReport> {
        let name = options.source.display_name();
        let reference = options.reference.resolve(now, self.settings.time_offset);
        log::debug!("cleaning {} as of {}", name, reference.to_rfc3339());

        let text = options.source.read()?;
        let transformed = markers::transform(&text, reference, &self.settings);

        let writes_back = matches!(
            (&options.source, &options.sink),
            (DocumentSource::File(input), DocumentSink::File(output)) if input == output
        );
        if writes_back && !transformed.changed() {
            log::info!("{}: nothing to do", name);
        } else {
            options.sink.write(&transformed.text)?;
        }

        if transformed.changed() {
            log::info!(
                "{}: {} -> {} bytes",
                name,
                text.len(),
                transformed.text.len()
            );
        }

        Ok(CleanReport {
            changed: transformed.changed(),
            diagnostics: transformed.diagnostics,
            name,
        })
    }
}
