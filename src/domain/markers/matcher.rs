//! Pairing start and end tags into a tree of blocks

use super::attributes::{self, Attributes};
use super::diagnostic::{AttributeErrorReason, Diagnostic, StructuralErrorReason};
use super::scanner::{MarkerKind, Tag, TagKind};
use super::settings::MarkerSettings;
use std::ops::Range;

/// A matched start/end pair and everything nested inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    pub start: Tag<'a>,
    pub end: Tag<'a>,
    /// `Err` blocks are never transformed
    pub attributes: Result<Attributes, AttributeErrorReason>,
    pub children: Vec<Block<'a>>,
}

impl Block<'_> {
    /// From the start tag's opening delimiter to the end tag's closing delimiter
    pub fn span(&self) -> Range<usize> {
        self.start.offset..self.end.end
    }

    /// Text between the two tags
    pub fn inner_span(&self) -> Range<usize> {
        self.start.end..self.end.offset
    }
}

/// Result of matching a well-nested tag sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedBlocks<'a> {
    pub blocks: Vec<Block<'a>>,
    /// Attribute errors, one per unusable start tag, in document order
    pub diagnostics: Vec<Diagnostic>,
}

/// An open start tag and the blocks already closed inside it
struct Frame<'a> {
    start: Tag<'a>,
    attributes: Result<Attributes, AttributeErrorReason>,
    children: Vec<Block<'a>>,
}

fn structural(tag: &Tag<'_>, reason: StructuralErrorReason) -> Diagnostic {
    Diagnostic::StructuralError {
        line: tag.line,
        column: tag.column,
        reason,
    }
}

fn marker_name(marker: MarkerKind, settings: &MarkerSettings) -> &str {
    match marker {
        MarkerKind::TimeLimited => &settings.tag_name,
        MarkerKind::RemovalMarker => &settings.removal_marker.tag_name,
    }
}

/// Build the block tree with a stack
///
/// Any unmatched or mismatched tag is returned as a structural error and no
/// blocks are produced at all.
pub fn match_tags<'a>(
    tags: Vec<Tag<'a>>,
    settings: &MarkerSettings,
) -> Result<MatchedBlocks<'a>, Diagnostic> {
    let mut stack: Vec<Frame<'a>> = Vec::new();
    let mut roots: Vec<Block<'a>> = Vec::new();
    let mut diagnostics = Vec::new();

    for tag in tags {
        match tag.kind {
            TagKind::Start => {
                let attributes =
                    attributes::parse(tag.marker, tag.attribute_text, settings.time_offset);
                if let Err(reason) = &attributes {
                    diagnostics.push(Diagnostic::AttributeError {
                        line: tag.line,
                        column: tag.column,
                        reason: reason.clone(),
                    });
                }
                stack.push(Frame {
                    start: tag,
                    attributes,
                    children: Vec::new(),
                });
            }
            TagKind::End => {
                let Some(frame) = stack.pop() else {
                    return Err(structural(&tag, StructuralErrorReason::UnmatchedEnd));
                };

                if frame.start.marker != tag.marker {
                    return Err(structural(
                        &tag,
                        StructuralErrorReason::MismatchedEnd {
                            expected: marker_name(frame.start.marker, settings).to_string(),
                            found: marker_name(tag.marker, settings).to_string(),
                        },
                    ));
                }

                let block = Block {
                    start: frame.start,
                    end: tag,
                    attributes: frame.attributes,
                    children: frame.children,
                };

                match stack.last_mut() {
                    Some(parent) => parent.children.push(block),
                    None => roots.push(block),
                }
            }
        }
    }

    if let Some(unclosed) = stack.pop() {
        return Err(structural(&unclosed.start, StructuralErrorReason::UnclosedStart));
    }

    Ok(MatchedBlocks {
        blocks: roots,
        diagnostics,
    })
}
