//! Turning classified blocks into edits
//!
//! Expired blocks are either stripped (markers and content deleted) or
//! unwrapped (markers and one layer of opening/closing lines deleted, body
//! kept and dedented). Anything whose shape does not allow a confident
//! unwrap is left exactly as it was and reported.

use super::assembler::{self, Edit};
use super::diagnostic::{Diagnostic, IneligibleReason};
use super::expiry::{Classification, ExpiryEvaluator};
use super::matcher::Block;
use std::ops::Range;

/// Spaces, tabs, and the `\r` of a CRLF line ending
fn is_horizontal_space(s: &str) -> bool {
    s.chars().all(|c| matches!(c, ' ' | '\t' | '\r'))
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| matches!(c, ' ' | '\t')).count()
}

fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// Offset of the line break ending the line that contains `pos` (or the text length)
fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |i| pos + i)
}

fn next_line_start(text: &str, pos: usize) -> usize {
    let end = line_end(text, pos);
    if end < text.len() {
        end + 1
    } else {
        end
    }
}

/// Whole lines (line break included) covering `range`, which starts on a line boundary
fn line_ranges(text: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut pos = range.start;
    while pos < range.end {
        let next = next_line_start(text, pos).min(range.end);
        lines.push(pos..next);
        pos = next;
    }
    lines
}

/// The part of `span` inside `kept`, widened to whole lines when only
/// horizontal space is left beside it
fn kept_overlap(text: &str, span: Range<usize>, kept: &Range<usize>) -> Option<Range<usize>> {
    let mut start = span.start.max(kept.start);
    let mut end = span.end.min(kept.end);
    if start >= end {
        return None;
    }

    let start_of_line = line_start(text, start);
    if is_horizontal_space(&text[start_of_line..start]) {
        start = start_of_line;
    }
    if end < kept.end && is_horizontal_space(&text[end..line_end(text, end)]) {
        end = next_line_start(text, end).min(kept.end);
    }

    Some(start..end)
}

/// Remove up to `unit` leading spaces or tabs from every line
fn dedent(text: &str, unit: usize) -> String {
    if unit == 0 {
        return text.to_string();
    }

    text.split_inclusive('\n')
        .map(|line| {
            let strip = line
                .chars()
                .take(unit)
                .take_while(|c| matches!(c, ' ' | '\t'))
                .count();
            &line[strip..]
        })
        .collect()
}

pub struct Rewriter<'t, 's> {
    text: &'t str,
    evaluator: ExpiryEvaluator<'s>,
    diagnostics: Vec<Diagnostic>,
}

impl<'t, 's> Rewriter<'t, 's> {
    pub fn new(text: &'t str, evaluator: ExpiryEvaluator<'s>) -> Self {
        Rewriter {
            text,
            evaluator,
            diagnostics: Vec::new(),
        }
    }

    /// Produce sorted, non-overlapping edits for the whole block forest
    pub fn rewrite(mut self, blocks: &[Block<'_>]) -> (Vec<Edit>, Vec<Diagnostic>) {
        let mut edits = Vec::new();
        self.visit(blocks, 0..self.text.len(), &mut edits);
        (edits, self.diagnostics)
    }

    /// Visit sibling blocks that all lie inside `region`
    fn visit(&mut self, blocks: &[Block<'_>], region: Range<usize>, edits: &mut Vec<Edit>) {
        for block in blocks {
            self.visit_block(block, region.clone(), edits);
        }
    }

    fn visit_block(&mut self, block: &Block<'_>, region: Range<usize>, edits: &mut Vec<Edit>) {
        let unwrap = match (&block.attributes, self.evaluator.classify(block)) {
            (Ok(attributes), Classification::Expired) => attributes.unwrap,
            _ => {
                self.visit(&block.children, block.inner_span(), edits);
                return;
            }
        };

        if !unwrap {
            log::debug!("stripping expired block at line {}", block.start.line);
            let range = self.strip_range(block, &region, edits);
            edits.push(Edit::delete(range));
            return;
        }

        match self.unwrap_edit(block) {
            Ok(edit) => {
                log::debug!("unwrapping expired block at line {}", block.start.line);
                edits.push(edit);
            }
            Err(reason) => {
                log::debug!(
                    "keeping expired block at line {}: {}",
                    block.start.line,
                    reason
                );
                self.diagnostics.push(Diagnostic::UnwrapIneligible {
                    line: block.start.line,
                    column: block.start.column,
                    reason,
                });
                self.visit(&block.children, block.inner_span(), edits);
            }
        }
    }

    /// The span removed for a stripped block
    ///
    /// When both markers own their lines the whole lines go, plus one of two
    /// blank lines that would otherwise end up adjacent.
    fn strip_range(
        &self,
        block: &Block<'_>,
        region: &Range<usize>,
        edits: &[Edit],
    ) -> Range<usize> {
        let text = self.text;
        let raw = block.span();
        let start = line_start(text, raw.start);
        let end_of_line = line_end(text, raw.end);

        if !is_horizontal_space(&text[start..raw.start])
            || !is_horizontal_space(&text[raw.end..end_of_line])
        {
            return raw;
        }

        let mut end = next_line_start(text, raw.end);
        if end < region.end && self.follows_blank_line(start, edits) {
            let following = next_line_start(text, end);
            if following <= region.end && is_blank(&text[end..line_end(text, end)]) {
                end = following;
            }
        }

        start..end
    }

    /// Whether the line before `start` is blank, looking through deletions
    /// that end exactly at `start`; the start of the text counts as blank
    fn follows_blank_line(&self, start: usize, edits: &[Edit]) -> bool {
        let text = self.text;
        let mut probe = start;
        for edit in edits.iter().rev() {
            if edit.range.end != probe || !edit.replacement.is_empty() {
                break;
            }
            probe = edit.range.start;
        }

        if probe == 0 {
            return true;
        }
        if line_start(text, probe) != probe {
            return false;
        }
        let prev = line_start(text, probe - 1);
        is_blank(&text[prev..probe - 1])
    }

    /// Build the replacement for an expired unwrap-mode block, or explain why not
    fn unwrap_edit(&mut self, block: &Block<'_>) -> Result<Edit, IneligibleReason> {
        let text = self.text;
        let start_tag = &block.start;
        let end_tag = &block.end;

        let start_line = line_start(text, start_tag.offset);
        let start_line_end = line_end(text, start_tag.end);
        let end_line = line_start(text, end_tag.offset);
        let end_line_end = line_end(text, end_tag.end);

        let markers_alone = is_horizontal_space(&text[start_line..start_tag.offset])
            && is_horizontal_space(&text[start_tag.end..start_line_end])
            && is_horizontal_space(&text[end_line..end_tag.offset])
            && is_horizontal_space(&text[end_tag.end..end_line_end]);
        if !markers_alone || start_line_end >= end_line {
            return Err(IneligibleReason::MarkerSharesLine);
        }

        let lines = line_ranges(text, start_line_end + 1..end_line);
        if lines.iter().all(|line| is_blank(&text[line.clone()])) {
            return Err(IneligibleReason::EmptyBody);
        }
        if lines.len() < 2 {
            return Err(IneligibleReason::NoShell);
        }

        let opening = lines[0].clone();
        let closing = lines[lines.len() - 1].clone();
        let marker_indent = indent_width(&text[start_line..start_tag.offset]);
        let opening_indent = indent_width(&text[opening.clone()]);
        if marker_indent > opening_indent {
            return Err(IneligibleReason::MarkerIndentedPastBody);
        }

        let kept = opening.end..closing.start;

        // Measured on the original text, before nested blocks are rewritten
        let unit = lines[1..lines.len() - 1]
            .iter()
            .map(|line| &text[line.clone()])
            .find(|line| !is_blank(line))
            .map_or(0, |line| indent_width(line).saturating_sub(opening_indent));

        // Blocks touching a shell line go with the shell
        let mut inner = Vec::new();
        for child in &block.children {
            let span = child.span();
            if span.start >= kept.start && span.end <= kept.end {
                self.visit_block(child, kept.clone(), &mut inner);
            } else if let Some(range) = kept_overlap(text, span, &kept) {
                log::debug!(
                    "discarding block at line {} with the shell",
                    child.start.line
                );
                inner.push(Edit::delete(range));
            }
        }
        let body = assembler::assemble(text, kept, &inner);

        Ok(Edit::replace(
            start_line..next_line_start(text, end_tag.end),
            dedent(&body, unit),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::markers::settings::MarkerSettings;
    use crate::domain::markers::{matcher, scanner};
    use chrono::{DateTime, NaiveDate, Utc};
    use std::collections::BTreeSet;

    fn reference() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn rewrite(text: &str) -> (String, Vec<Diagnostic>) {
        let settings = MarkerSettings::default();
        let names = BTreeSet::new();
        let matched = matcher::match_tags(scanner::scan(text, &settings), &settings).unwrap();
        let evaluator = ExpiryEvaluator::new(reference(), &names);
        let (edits, diagnostics) = Rewriter::new(text, evaluator).rewrite(&matched.blocks);
        (assembler::apply(text, &edits), diagnostics)
    }

    fn reasons(diagnostics: &[Diagnostic]) -> Vec<IneligibleReason> {
        diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::UnwrapIneligible { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_line_helpers() {
        let text = "ab\ncd\n\nef";
        assert_eq!(line_start(text, 4), 3);
        assert_eq!(line_end(text, 4), 5);
        assert_eq!(next_line_start(text, 4), 6);
        assert_eq!(next_line_start(text, 8), text.len());
        assert_eq!(line_ranges(text, 0..text.len()), vec![0..3, 3..6, 6..7, 7..9]);
        assert_eq!(indent_width(" \t x"), 3);
    }

    #[test]
    fn test_dedent() {
        assert_eq!(dedent("    a\n  b\n\n      c\n", 4), "a\nb\n\n  c\n");
        assert_eq!(dedent("\tx\n", 1), "x\n");
        assert_eq!(dedent("  x", 0), "  x");
    }

    #[test]
    fn test_strip_removes_whole_lines() {
        let text = "\
keep();
  /* <time-limited to=\"2020-12-31 23:59:59\"> */
  gone();
  /* </time-limited> */
also();
";
        let (out, diagnostics) = rewrite(text);
        assert_eq!(out, "keep();\nalso();\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_strip_inline_block_keeps_surrounding_code() {
        let text = "a(); /* <time-limited to=\"2020-12-31 23:59:59\"> */b();/* </time-limited> */ c();\n";
        let (out, _) = rewrite(text);
        assert_eq!(out, "a();  c();\n");
    }

    #[test]
    fn test_strip_collapses_double_blank_line() {
        let text = "\
a();

/* <time-limited to=\"2020-12-31 23:59:59\"> */
gone();
/* </time-limited> */

b();
";
        let (out, _) = rewrite(text);
        assert_eq!(out, "a();\n\nb();\n");
    }

    #[test]
    fn test_strip_collapse_looks_through_adjacent_deletions() {
        let text = "\
a();

/* <time-limited to=\"2020-12-31 23:59:59\"> */
one();
/* </time-limited> */
/* <time-limited to=\"2020-12-31 23:59:59\"> */
two();
/* </time-limited> */

b();
";
        let (out, _) = rewrite(text);
        assert_eq!(out, "a();\n\nb();\n");
    }

    #[test]
    fn test_strip_at_end_of_text_without_newline() {
        let text = "a();\n/* <time-limited to=\"2020-12-31 23:59:59\"> */\ngone();\n/* </time-limited> */";
        let (out, _) = rewrite(text);
        assert_eq!(out, "a();\n");
    }

    #[test]
    fn test_unwrap_keeps_body_dedented() {
        let text = "\
/* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */
if (isReleased) {
    run();
}
/* </time-limited> */
";
        let (out, diagnostics) = rewrite(text);
        assert_eq!(out, "run();\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unwrap_nested_in_indented_code() {
        let text = "\
for (;;) {
    /* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */
    if (isReleased) {
      add(i);

      log(i);
    }
    /* </time-limited> */
}
";
        let (out, _) = rewrite(text);
        assert_eq!(out, "for (;;) {\n    add(i);\n\n    log(i);\n}\n");
    }

    #[test]
    fn test_unwrap_rewrites_nested_blocks_before_dedent() {
        let text = "\
/* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */
if (isReleased) {
  released();

  /* <time-limited to=\"2020-12-31 23:59:59\"> */
  temporary();
  /* </time-limited> */

  /* <time-limited to=\"2099-12-31 23:59:59\"> */
  later();
  /* </time-limited> */
}
/* </time-limited> */
";
        let expected = "\
released();

/* <time-limited to=\"2099-12-31 23:59:59\"> */
later();
/* </time-limited> */
";
        let (out, _) = rewrite(text);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_unwrap_refused_when_marker_shares_line() {
        let text = "/* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */ foo(); /* </time-limited> */\n";
        let (out, diagnostics) = rewrite(text);
        assert_eq!(out, text);
        assert_eq!(reasons(&diagnostics), vec![IneligibleReason::MarkerSharesLine]);

        let text = "x /* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */\nif {\n  a\n}\n/* </time-limited> */\n";
        let (out, diagnostics) = rewrite(text);
        assert_eq!(out, text);
        assert_eq!(reasons(&diagnostics), vec![IneligibleReason::MarkerSharesLine]);
    }

    #[test]
    fn test_unwrap_refused_for_empty_body() {
        let text = "/* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */\n\n/* </time-limited> */\n";
        let (out, diagnostics) = rewrite(text);
        assert_eq!(out, text);
        assert_eq!(reasons(&diagnostics), vec![IneligibleReason::EmptyBody]);
    }

    #[test]
    fn test_unwrap_refused_without_shell() {
        let text = "/* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */\nfoo();\n/* </time-limited> */\n";
        let (out, diagnostics) = rewrite(text);
        assert_eq!(out, text);
        assert_eq!(reasons(&diagnostics), vec![IneligibleReason::NoShell]);
    }

    #[test]
    fn test_unwrap_refused_when_marker_indented_past_body() {
        let text = "\
      /* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */
  if (isReleased) {
    run();
  }
      /* </time-limited> */
";
        let (out, diagnostics) = rewrite(text);
        assert_eq!(out, text);
        assert_eq!(
            reasons(&diagnostics),
            vec![IneligibleReason::MarkerIndentedPastBody]
        );
    }

    #[test]
    fn test_unwrap_discards_block_on_opening_line() {
        let text = "\
/* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */
if (flag) { /* <time-limited to=\"2020-12-31 23:59:59\"> */ legacy(); /* </time-limited> */
  run();
}
/* </time-limited> */
";
        let (out, diagnostics) = rewrite(text);
        assert_eq!(out, "run();\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unwrap_discards_block_spanning_shell_lines() {
        let text = "\
/* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */
if (a) { /* <time-limited to=\"2099-12-31 23:59:59\"> */
  guarded();
} /* </time-limited> */
/* </time-limited> */
after();
";
        let (out, diagnostics) = rewrite(text);
        assert_eq!(out, "after();\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unwrap_discards_block_reaching_into_body() {
        let text = "\
/* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */
if (a) { /* <time-limited to=\"2099-12-31 23:59:59\"> */
  guarded();
  /* </time-limited> */
  run();
}
/* </time-limited> */
";
        let (out, _) = rewrite(text);
        assert_eq!(out, "run();\n");
    }

    #[test]
    fn test_strip_at_start_of_text_drops_following_blank_line() {
        let text = "/* <time-limited to=\"2020-12-31 23:59:59\"> */\ngone();\n/* </time-limited> */\n\nfoo();\n";
        let (out, _) = rewrite(text);
        assert_eq!(out, "foo();\n");
    }

    #[test]
    fn test_ineligible_block_still_processes_children() {
        let text = "\
/* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */ if (a) {
  keep();
  /* <time-limited to=\"2020-12-31 23:59:59\"> */
  gone();
  /* </time-limited> */
} /* </time-limited> */
";
        let expected = "\
/* <time-limited to=\"2020-12-31 23:59:59\" unwrap-block> */ if (a) {
  keep();
} /* </time-limited> */
";
        let (out, diagnostics) = rewrite(text);
        assert_eq!(out, expected);
        assert_eq!(reasons(&diagnostics), vec![IneligibleReason::MarkerSharesLine]);
    }

    #[test]
    fn test_active_block_with_bad_attributes_is_kept() {
        let text = "\
/* <time-limited to=\"someday\"> */
  kept();
  /* <time-limited to=\"2020-12-31 23:59:59\"> */
  gone();
  /* </time-limited> */
/* </time-limited> */
";
        let expected = "\
/* <time-limited to=\"someday\"> */
  kept();
/* </time-limited> */
";
        let (out, _) = rewrite(text);
        assert_eq!(out, expected);
    }
}
