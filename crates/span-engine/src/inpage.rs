//! In-page highlighting by explicit offsets (browser extension)
//!
//! The extension analyzes a page selection, so the returned spans are offsets
//! into the selected text. The selection can cross many DOM text nodes; for
//! each node the content script asks for a plan: which parts of the node's
//! text stay plain and which get wrapped in `<mark data-sev=..>`.
//!
//! Container offsets are UTF-16 offsets into the text of the selection's
//! common ancestor element.

use crate::segments::build_segments;
use serde::Serialize;
use shared_types::{Severity, Span, Summary};

/// Half-open `[start, end)` range of container offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn intersect(&self, other: &Range) -> Option<Range> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end > start).then_some(Range { start, end })
    }
}

/// A piece of a text node after highlighting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MarkPiece {
    Text { text: String },
    Mark { text: String, severity: Severity },
}

impl MarkPiece {
    pub fn text(&self) -> &str {
        match self {
            MarkPiece::Text { text } | MarkPiece::Mark { text, .. } => text,
        }
    }
}

/// Plan the highlighting of one text node.
///
/// `node_start` is the node's offset within the container text and
/// `selection` the selected range within it. `spans` are relative to the
/// selected text. Returns `None` when nothing in the node needs marking, so
/// the caller can leave the node untouched.
pub fn plan_text_node(
    node_text: &str,
    node_start: usize,
    selection: Range,
    spans: &[Span],
) -> Option<Vec<MarkPiece>> {
    let node_len: usize = node_text.encode_utf16().count();
    let node = Range::new(node_start, node_start + node_len);
    let visible = node.intersect(&selection)?;

    let local: Vec<Span> = spans
        .iter()
        .filter_map(|span| {
            let absolute = selection_to_container(span, selection)?;
            let hit = absolute.intersect(&visible)?;
            Some(span.with_range(
                (hit.start - node_start) as i64,
                (hit.end - node_start) as i64,
            ))
        })
        .collect();

    if local.is_empty() {
        return None;
    }

    let pieces = build_segments(node_text, &local)
        .into_iter()
        .map(|segment| match segment.style {
            Some(style) => MarkPiece::Mark {
                text: segment.text,
                severity: style.severity,
            },
            None => MarkPiece::Text { text: segment.text },
        })
        .collect();
    Some(pieces)
}

/// Map a selection-relative span into container offsets, clamped to the
/// selection
fn selection_to_container(span: &Span, selection: Range) -> Option<Range> {
    let len = selection.len() as i64;
    let start = span.start.clamp(0, len) as usize;
    let end = span.end.clamp(0, len) as usize;
    (end > start).then(|| Range::new(selection.start + start, selection.start + end))
}

/// Severity used to wrap the whole selection when a result has no spans
pub fn whole_selection_severity(summary: Option<&Summary>) -> Severity {
    summary.and_then(Summary::highest).unwrap_or(Severity::Low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn joined(pieces: &[MarkPiece]) -> String {
        pieces.iter().map(MarkPiece::text).collect()
    }

    #[test]
    fn test_node_outside_selection_is_skipped() {
        let spans = vec![Span::new("x", Severity::High, 0, 5)];
        assert_eq!(plan_text_node("hello", 0, Range::new(10, 20), &spans), None);
    }

    #[test]
    fn test_node_without_hits_is_skipped() {
        // span covers the first 3 selected units, node starts later
        let spans = vec![Span::new("x", Severity::High, 0, 3)];
        assert_eq!(plan_text_node("world", 8, Range::new(0, 13), &spans), None);
    }

    #[test]
    fn test_span_offsets_are_relative_to_selection() {
        // container text: "Intro. You waive rights." selection starts at 7
        let node = "You waive rights.";
        let selection = Range::new(7, 24);
        let spans = vec![Span::new("Waiver", Severity::High, 4, 9)];

        let pieces = plan_text_node(node, 7, selection, &spans).unwrap();
        assert_eq!(
            pieces,
            vec![
                MarkPiece::Text { text: "You ".to_string() },
                MarkPiece::Mark {
                    text: "waive".to_string(),
                    severity: Severity::High
                },
                MarkPiece::Text {
                    text: " rights.".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_only_selected_part_of_node_is_marked() {
        // node "abcdefghij" at 0, selection covers "defg"
        let spans = vec![Span::new("all", Severity::Med, 0, 100)];
        let pieces = plan_text_node("abcdefghij", 0, Range::new(3, 7), &spans).unwrap();
        let marked: Vec<&str> = pieces
            .iter()
            .filter(|p| matches!(p, MarkPiece::Mark { .. }))
            .map(MarkPiece::text)
            .collect();
        assert_eq!(marked, vec!["defg"]);
        assert_eq!(joined(&pieces), "abcdefghij");
    }

    #[test]
    fn test_span_crossing_nodes() {
        // two nodes "abc" (0..3) and "def" (3..6), one span over "bcde"
        let selection = Range::new(0, 6);
        let spans = vec![Span::new("x", Severity::Low, 1, 5)];

        let first = plan_text_node("abc", 0, selection, &spans).unwrap();
        let second = plan_text_node("def", 3, selection, &spans).unwrap();
        assert_eq!(first.last().unwrap().text(), "bc");
        assert_eq!(second.first().unwrap().text(), "de");
    }

    #[test]
    fn test_overlaps_resolve_by_severity() {
        let spans = vec![
            Span::new("low", Severity::Low, 0, 6),
            Span::new("high", Severity::High, 2, 4),
        ];
        let pieces = plan_text_node("abcdef", 0, Range::new(0, 6), &spans).unwrap();
        assert_eq!(joined(&pieces), "abcdef");
        assert_eq!(pieces.len(), 3);
        assert_eq!(
            pieces[1],
            MarkPiece::Mark {
                text: "cd".to_string(),
                severity: Severity::High
            }
        );
    }

    #[test]
    fn test_whole_selection_severity() {
        assert_eq!(whole_selection_severity(None), Severity::Low);
        let summary = Summary {
            risk_count: 1,
            highest_severity: Some("HIGH".to_string()),
        };
        assert_eq!(whole_selection_severity(Some(&summary)), Severity::High);
    }
}
