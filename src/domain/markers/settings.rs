//! Marker syntax settings

use chrono::FixedOffset;
use std::collections::BTreeSet;

pub const DEFAULT_OPEN_DELIMITER: &str = "/*";
pub const DEFAULT_CLOSE_DELIMITER: &str = "*/";
pub const DEFAULT_TAG_NAME: &str = "time-limited";
pub const DEFAULT_REMOVAL_MARKER_TAG_NAME: &str = "removal-marker";

/// The pair of strings that open and close a comment in the host language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDelimiters {
    pub open: String,
    pub close: String,
}

impl CommentDelimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        CommentDelimiters {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for CommentDelimiters {
    fn default() -> Self {
        CommentDelimiters::new(DEFAULT_OPEN_DELIMITER, DEFAULT_CLOSE_DELIMITER)
    }
}

/// Settings for `removal-marker` blocks, which are removed by name rather than by date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalMarkerSettings {
    pub tag_name: String,
    /// Marker names scheduled for removal
    pub names: BTreeSet<String>,
}

impl Default for RemovalMarkerSettings {
    fn default() -> Self {
        RemovalMarkerSettings {
            tag_name: DEFAULT_REMOVAL_MARKER_TAG_NAME.to_string(),
            names: BTreeSet::new(),
        }
    }
}

/// Everything the engine needs to know about how markers are spelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSettings {
    pub delimiters: CommentDelimiters,
    pub tag_name: String,
    /// Offset at which `to="..."` wall-clock values are read
    pub time_offset: FixedOffset,
    pub removal_marker: RemovalMarkerSettings,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        MarkerSettings {
            delimiters: CommentDelimiters::default(),
            tag_name: DEFAULT_TAG_NAME.to_string(),
            time_offset: utc_offset(),
            removal_marker: RemovalMarkerSettings::default(),
        }
    }
}

fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset is always valid")
}

/// Parse a fixed UTC offset such as `+09:00`, `-0530`, `Z` or `UTC`
pub fn parse_time_offset(input: &str) -> Option<FixedOffset> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Some(utc_offset());
    }

    let (sign, rest) = match trimmed.chars().next()? {
        '+' => (1, &trimmed[1..]),
        '-' => (-1, &trimmed[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // `HH:MM` must keep its colon in the middle if it has one
    if rest.contains(':') && rest.find(':') != Some(2) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
