//! Sidebar rows, range labels and the plain-text flag export

use crate::normalize::normalize_span;
use crate::offsets::Utf16Index;
use crate::units::Normalized;
use crate::words::WordIndex;
use serde::Serialize;
use shared_types::{Span, SpanUnit, Summary};

/// One entry in the flags sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarRow {
    pub span: Span,
    /// `12–40` for character units, `w3–w9` for word units
    pub display_range: String,
    /// Segment id to scroll to; `None` when the span is not renderable
    pub target_id: Option<String>,
}

/// Word-unit label for a character range: `w{start}–w{end}` (end exclusive)
pub fn word_range_label(words: &WordIndex, start: usize, end: usize) -> String {
    let w_start = words.word_at(start);
    let w_end = words.word_at(end.saturating_sub(1).max(start)) + 1;
    format!("w{}–w{}", w_start, w_end)
}

fn char_range_label(span: &Span) -> String {
    format!("{}–{}", span.start, span.end)
}

/// Sidebar rows for spans already run through unit detection.
///
/// `words` must be the index of `text`; it is only consulted for word units.
pub fn sidebar_rows(text: &str, words: &WordIndex, normalized: &Normalized) -> Vec<SidebarRow> {
    let index = Utf16Index::new(text);
    let words = match normalized.unit {
        SpanUnit::Word => Some(words),
        SpanUnit::Char => None,
    };

    normalized
        .spans
        .iter()
        .enumerate()
        .map(|(position, span)| {
            let renderable = normalize_span(&index, position, span);
            let display_range = match (words, renderable) {
                (Some(words), Some(r)) => word_range_label(words, r.start, r.end),
                (Some(words), None) => {
                    let at = span.start.max(0) as usize;
                    word_range_label(words, at, at)
                }
                (None, _) => char_range_label(span),
            };
            SidebarRow {
                span: span.clone(),
                display_range,
                target_id: renderable.map(|r| r.target_id()),
            }
        })
        .collect()
}

/// Plain-text list of flags, used for copy-to-clipboard
pub fn flags_text(rows: &[SidebarRow]) -> String {
    if rows.is_empty() {
        return "No flags found.".to_string();
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            format!(
                "{}. [{}] {} — {} (range: {})",
                i + 1,
                row.span.severity,
                row.span.label,
                row.span.explanation.as_deref().unwrap_or("No explanation"),
                row.display_range
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `("Risks: n", "Highest: X")` summary pills; `—` when nothing is known
pub fn summary_pills(summary: Option<&Summary>) -> (String, String) {
    let risks = summary.map(|s| s.risk_count).unwrap_or(0);
    let highest = summary
        .and_then(|s| s.highest_severity.as_deref())
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_uppercase())
        .unwrap_or_else(|| "—".to_string());
    (format!("Risks: {}", risks), format!("Highest: {}", highest))
}
