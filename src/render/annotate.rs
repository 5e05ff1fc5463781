//! Highlight overlay
//!
//! Inserts color markers around day numerals and their labels in already
//! laid-out grid lines. Positions come from the grid builder, so a directive
//! for day 1 can never land on the "1" inside "11" and the order in which
//! directives are applied does not matter.

use std::collections::HashSet;

use crate::render::grid::CellSpan;
use crate::render::palette::{HighlightStatus, Palette};
use crate::render::width::span_byte_range;

/// Highlight request for one day of the month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightDirective {
    pub day_of_month: u32,
    /// Label text as placed in the grid
    pub label: String,
    pub status: HighlightStatus,
    pub numeral: CellSpan,
    pub label_span: CellSpan,
}

/// Wrap the text covered by `span` in `start` ... `end`.
/// Returns `false` and leaves the line alone if the span is out of bounds.
fn wrap_span(lines: &mut [String], span: CellSpan, start: &str, end: &str) -> bool {
    let Some(line) = lines.get_mut(span.line) else {
        return false;
    };
    let Some(range) = span_byte_range(line, span.column, span.width) else {
        return false;
    };
    let mut styled = String::with_capacity(line.len() + start.len() + end.len());
    styled.push_str(&line[..range.start]);
    styled.push_str(start);
    styled.push_str(&line[range.clone()]);
    styled.push_str(end);
    styled.push_str(&line[range.end..]);
    *line = styled;
    true
}

/// Apply every directive to `lines`, returning the styled copy.
///
/// With a plain palette the lines come back unchanged.
pub fn annotate(lines: &[String], directives: &[HighlightDirective], palette: Palette) -> Vec<String> {
    let mut out = lines.to_vec();
    if !palette.is_enabled() {
        return out;
    }

    let end = palette.reset();
    let mut labelled: HashSet<(u32, &str)> = HashSet::new();

    for directive in directives {
        let start = palette.status_start(directive.status);
        if !wrap_span(&mut out, directive.numeral, &start, &end) {
            tracing::debug!(day = directive.day_of_month, "numeral span out of bounds");
            continue;
        }

        if directive.label.trim().is_empty() {
            continue;
        }
        if !labelled.insert((directive.day_of_month, directive.label.as_str())) {
            continue;
        }
        wrap_span(&mut out, directive.label_span, &start, &end);
    }

    out
}
