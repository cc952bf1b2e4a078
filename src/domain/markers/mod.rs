//! Time-limited marker engine
//!
//! Scans comment-embedded markers, pairs them into a block tree, decides
//! which blocks are due and rewrites the text. The whole pipeline is pure:
//! the caller supplies the text and the reference instant.

pub mod assembler;
pub mod attributes;
pub mod diagnostic;
pub mod expiry;
pub mod matcher;
pub mod rewriter;
pub mod scanner;
pub mod settings;

pub use attributes::{Attributes, Directive};
pub use diagnostic::{
    AttributeErrorReason, Diagnostic, IneligibleReason, Severity, StructuralErrorReason,
};
pub use expiry::{Classification, ExpiryEvaluator};
pub use matcher::Block;
pub use settings::{CommentDelimiters, MarkerSettings, RemovalMarkerSettings};

use chrono::{DateTime, Utc};
use rewriter::Rewriter;

/// Output of one transformation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
    changed: bool,
}

impl Transformed {
    fn unchanged(text: &str, diagnostics: Vec<Diagnostic>) -> Self {
        Transformed {
            text: text.to_string(),
            diagnostics,
            changed: false,
        }
    }

    /// Whether any edit was applied
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Whether the document was left alone because of a structural error
    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_fatal)
    }

    pub fn fatal(&self) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.is_fatal())
    }
}

/// Remove or unwrap every block that is due at `reference`
pub fn transform(text: &str, reference: DateTime<Utc>, settings: &MarkerSettings) -> Transformed {
    let tags = scanner::scan(text, settings);
    if tags.is_empty() {
        return Transformed::unchanged(text, Vec::new());
    }

    let matched = match matcher::match_tags(tags, settings) {
        Ok(matched) => matched,
        Err(diagnostic) => {
            log::warn!("document left untouched: {}", diagnostic);
            return Transformed::unchanged(text, vec![diagnostic]);
        }
    };

    let evaluator = ExpiryEvaluator::new(reference, &settings.removal_marker.names);
    let (edits, rewrite_diagnostics) = Rewriter::new(text, evaluator).rewrite(&matched.blocks);

    let mut diagnostics = matched.diagnostics;
    diagnostics.extend(rewrite_diagnostics);
    diagnostics.sort_by_key(Diagnostic::position);

    log::debug!(
        "{} block(s) at top level, {} edit(s)",
        matched.blocks.len(),
        edits.len()
    );

    if edits.is_empty() {
        return Transformed::unchanged(text, diagnostics);
    }

    let output = assembler::apply(text, &edits);
    let changed = output != text;
    Transformed {
        text: output,
        diagnostics,
        changed,
    }
}
