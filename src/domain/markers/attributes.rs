//! Start tag attribute parsing

use super::diagnostic::AttributeErrorReason;
use super::scanner::MarkerKind;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

pub const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const UNWRAP_FLAG: &str = "unwrap-block";

/// `name="value"`, `name='value'` or a bare `name`
fn attribute_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'))?"#).unwrap()
    })
}

/// What decides whether a block is due
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Expires after the last millisecond of `expiry`
    TimeLimited { expiry: DateTime<Utc> },
    /// Due once `name` is scheduled for removal
    RemovalMarker { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    pub directive: Directive,
    pub unwrap: bool,
    /// Free-form note from `c="..."`, never used for decisions
    pub comment: Option<String>,
}

impl Attributes {
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        match &self.directive {
            Directive::TimeLimited { expiry } => Some(*expiry),
            Directive::RemovalMarker { .. } => None,
        }
    }
}

/// Split raw attribute text into (name, value) pairs in source order
fn raw_attributes(text: &str) -> Vec<(&str, Option<&str>)> {
    attribute_regex()
        .captures_iter(text)
        .filter_map(|cap| {
            let name = cap.get(1)?.as_str();
            let value = cap.get(2).or_else(|| cap.get(3)).map(|m| m.as_str());
            Some((name, value))
        })
        .collect()
}

fn first_value<'a>(attrs: &[(&'a str, Option<&'a str>)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(n, _)| *n == name)
        .and_then(|(_, value)| *value)
}

/// Read a `YYYY-MM-DD HH:MM:SS` wall-clock value at `offset`
pub fn parse_expiry(value: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), EXPIRY_FORMAT).ok()?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse the attribute text of a start tag
///
/// Unknown attributes are ignored so newer annotations keep working with
/// older tooling.
pub fn parse(
    marker: MarkerKind,
    text: &str,
    offset: FixedOffset,
) -> Result<Attributes, AttributeErrorReason> {
    let attrs = raw_attributes(text);

    let unwrap = attrs
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case(UNWRAP_FLAG));
    let comment = first_value(&attrs, "c").map(str::to_string);

    let directive = match marker {
        MarkerKind::TimeLimited => {
            let raw = first_value(&attrs, "to").ok_or(AttributeErrorReason::MissingExpiry)?;
            let expiry = parse_expiry(raw, offset)
                .ok_or_else(|| AttributeErrorReason::InvalidExpiry(raw.to_string()))?;
            Directive::TimeLimited { expiry }
        }
        MarkerKind::RemovalMarker => {
            let name = first_value(&attrs, "name")
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or(AttributeErrorReason::MissingName)?;
            Directive::RemovalMarker {
                name: name.to_string(),
            }
        }
    };

    Ok(Attributes {
        directive,
        unwrap,
        comment,
    })
}
