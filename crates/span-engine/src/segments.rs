//! Segment builder: split text into non-overlapping, uniformly styled runs
//!
//! Every span boundary (plus 0 and the text length) is a cut point. Between
//! two consecutive cut points span coverage cannot change, so each interval
//! becomes one segment. Covered intervals take the style of the covering
//! span with the highest severity; among equal severities the span that
//! comes first in the input wins.

use crate::normalize::{normalize_spans, NormalizedSpan};
use crate::offsets::Utf16Index;
use crate::style::HighlightStyle;
use serde::Serialize;
use shared_types::Span;

/// One run of the rendered text.
///
/// `start`/`end` are UTF-16 offsets. Concatenating the `text` of all
/// segments in order reproduces the source exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub key: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<HighlightStyle>,
    /// `r{start}-{end}` of the covering span's normalized range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Position of the covering span in the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_index: Option<usize>,
}

impl Segment {
    fn plain(key: String, text: &str, start: usize, end: usize) -> Self {
        Self {
            key,
            text: text.to_string(),
            start,
            end,
            style: None,
            id: None,
            span_index: None,
        }
    }

    fn highlighted(key: String, text: &str, start: usize, end: usize, span: &NormalizedSpan) -> Self {
        Self {
            key,
            text: text.to_string(),
            start,
            end,
            style: Some(HighlightStyle::for_severity(span.severity)),
            id: Some(span.target_id()),
            span_index: Some(span.index),
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.style.is_some()
    }
}

/// Build segments for `text` highlighted by character-offset `spans`
pub fn build_segments(text: &str, spans: &[Span]) -> Vec<Segment> {
    build_segments_indexed(&Utf16Index::new(text), spans)
}

/// Same as [`build_segments`] over a prebuilt offset index
pub fn build_segments_indexed(index: &Utf16Index, spans: &[Span]) -> Vec<Segment> {
    if index.is_empty() {
        return vec![Segment::plain("all".to_string(), "", 0, 0)];
    }

    let normalized = normalize_spans(index, spans);
    let points = cut_points(index.len_utf16(), &normalized);

    points
        .windows(2)
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let key = format!("seg-{}-{}", a, b);
            let slice = index.slice(a, b);
            match strongest_covering(&normalized, a, b) {
                Some(span) => Segment::highlighted(key, slice, a, b, span),
                None => Segment::plain(key, slice, a, b),
            }
        })
        .collect()
}

/// Sorted, deduplicated boundaries including 0 and `len`
fn cut_points(len: usize, spans: &[NormalizedSpan]) -> Vec<usize> {
    let mut points = Vec::with_capacity(spans.len() * 2 + 2);
    points.push(0);
    points.push(len);
    for span in spans {
        points.push(span.start);
        points.push(span.end);
    }
    points.sort_unstable();
    points.dedup();
    points
}

/// Highest-severity span covering `[a, b)`; ties go to the earliest input
fn strongest_covering(spans: &[NormalizedSpan], a: usize, b: usize) -> Option<&NormalizedSpan> {
    spans
        .iter()
        .filter(|span| span.covers(a, b))
        .fold(None, |best: Option<&NormalizedSpan>, span| match best {
            Some(current) if current.severity.rank() >= span.severity.rank() => Some(current),
            _ => Some(span),
        })
}

/// Concatenated segment text
pub fn concat(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::Severity;

    #[test]
    fn test_no_spans_is_one_plain_segment() {
        let segments = build_segments("plain text", &[]);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].key, "seg-0-10");
        assert_eq!(segments[0].text, "plain text");
        assert!(!segments[0].is_highlighted());
    }

    #[test]
    fn test_empty_text_yields_single_empty_segment() {
        let spans = vec![Span::new("x", Severity::High, 0, 5)];
        let segments = build_segments("", &spans);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].key, "all");
        assert_eq!(segments[0].text, "");
    }

    #[test]
    fn test_severity_precedence() {
        let text = "abcdefghijklmno";
        let spans = vec![
            Span::new("low", Severity::Low, 0, 10),
            Span::new("high", Severity::High, 5, 15),
        ];
        let segments = build_segments(text, &spans);

        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["abcde", "fghij", "klmno"]);

        let severities: Vec<Option<Severity>> = segments
            .iter()
            .map(|s| s.style.map(|st| st.severity))
            .collect();
        assert_eq!(
            severities,
            vec![Some(Severity::Low), Some(Severity::High), Some(Severity::High)]
        );
        assert_eq!(segments[1].id.as_deref(), Some("r5-15"));
        assert_eq!(segments[2].id.as_deref(), Some("r5-15"));
        assert_eq!(segments[0].id.as_deref(), Some("r0-10"));
    }

    #[test]
    fn test_equal_severity_first_input_wins() {
        let spans = vec![
            Span::new("first", Severity::Med, 2, 8),
            Span::new("second", Severity::Med, 0, 10),
        ];
        let segments = build_segments("0123456789", &spans);
        let middle = segments.iter().find(|s| s.start == 2).unwrap();
        assert_eq!(middle.span_index, Some(0));
        assert_eq!(middle.id.as_deref(), Some("r2-8"));

        let edge = segments.iter().find(|s| s.start == 0).unwrap();
        assert_eq!(edge.span_index, Some(1));
    }

    #[test]
    fn test_critical_outranks_high() {
        let spans = vec![
            Span::new("high", Severity::High, 0, 4),
            Span::new("critical", Severity::Critical, 0, 4),
        ];
        let segments = build_segments("abcd", &spans);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].style.unwrap().severity, Severity::Critical);
    }

    #[test]
    fn test_out_of_bounds_span_id_uses_clamped_range() {
        let spans = vec![Span::new("all", Severity::Med, -3, 1000)];
        let segments = build_segments("0123456789", &spans);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].id.as_deref(), Some("r0-10"));
    }

    #[test]
    fn test_zero_width_span_is_ignored() {
        let spans = vec![Span::new("dot", Severity::High, 3, 3)];
        let segments = build_segments("0123456789", &spans);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_highlighted());
    }

    #[test]
    fn test_multibyte_text_round_trips() {
        let text = "Héllo 😀 wörld";
        let spans = vec![
            Span::new("emoji", Severity::High, 6, 8),
            Span::new("split pair", Severity::Low, 7, 12),
        ];
        let segments = build_segments(text, &spans);
        assert_eq!(concat(&segments), text);
        assert!(segments.iter().all(|s| !s.text.is_empty()));
        assert_eq!(segments[1].text, "😀");
    }
}
