//! Tag scanning
//!
//! Finds every marker tag that lives inside a comment, in document order.
//! Text outside comment delimiters is never inspected for tags.

use super::settings::MarkerSettings;
use regex::Regex;
use std::sync::OnceLock;

/// `< name attrs >` or `< /name >`, possibly spread over several lines
fn tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)^\s*<\s*(/)?\s*([A-Za-z][A-Za-z0-9_-]*)(.*)>\s*$").unwrap()
    })
}

/// Which marker a tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    TimeLimited,
    RemovalMarker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Start,
    End,
}

/// One marker comment found in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub kind: TagKind,
    pub marker: MarkerKind,
    /// Byte offset of the opening comment delimiter
    pub offset: usize,
    /// Byte offset just past the closing comment delimiter
    pub end: usize,
    /// 1-based line of `offset`
    pub line: usize,
    /// 1-based column (in characters) of `offset`
    pub column: usize,
    /// Everything between the tag name and `>`; empty for end tags
    pub attribute_text: &'a str,
}

/// Incremental byte offset to line/column conversion
struct Cursor<'a> {
    text: &'a str,
    offset: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor {
            text,
            offset: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// Advance to `target` (never backwards) and return its (line, column)
    fn advance_to(&mut self, target: usize) -> (usize, usize) {
        for (idx, ch) in self.text[self.offset..target].char_indices() {
            if ch == '\n' {
                self.line += 1;
                self.line_start = self.offset + idx + 1;
            }
        }
        self.offset = target;
        let column = self.text[self.line_start..target].chars().count() + 1;
        (self.line, column)
    }
}

/// Scan `text` for marker tags
pub fn scan<'a>(text: &'a str, settings: &MarkerSettings) -> Vec<Tag<'a>> {
    let open = settings.delimiters.open.as_str();
    let close = settings.delimiters.close.as_str();
    if open.is_empty() || close.is_empty() {
        return Vec::new();
    }

    let mut tags = Vec::new();
    let mut cursor = Cursor::new(text);
    let mut pos = 0;

    while let Some(found) = text[pos..].find(open) {
        let comment_start = pos + found;
        let inner_start = comment_start + open.len();
        let Some(close_found) = text[inner_start..].find(close) else {
            // Unterminated comment: the rest is plain text
            break;
        };
        let inner_end = inner_start + close_found;
        let comment_end = inner_end + close.len();

        if let Some((kind, marker, attribute_text)) =
            recognize(&text[inner_start..inner_end], settings)
        {
            let (line, column) = cursor.advance_to(comment_start);
            tags.push(Tag {
                kind,
                marker,
                offset: comment_start,
                end: comment_end,
                line,
                column,
                attribute_text,
            });
        }

        pos = comment_end;
    }

    log::debug!("scanned {} marker tag(s)", tags.len());
    tags
}

/// Decide whether a comment body is one of our tags
fn recognize<'a>(
    inner: &'a str,
    settings: &MarkerSettings,
) -> Option<(TagKind, MarkerKind, &'a str)> {
    let caps = tag_regex().captures(inner)?;
    let name = caps.get(2)?.as_str();

    let marker = if name == settings.tag_name {
        MarkerKind::TimeLimited
    } else if name == settings.removal_marker.tag_name {
        MarkerKind::RemovalMarker
    } else {
        return None;
    };

    if caps.get(1).is_some() {
        Some((TagKind::End, marker, ""))
    } else {
        let attrs = caps.get(3).map(|m| m.as_str()).unwrap_or("");
        Some((TagKind::Start, marker, attrs))
    }
}
