//! Clamp character-offset spans into text bounds

use crate::offsets::Utf16Index;
use shared_types::{Severity, Span};

/// A renderable span: clamped, non-empty, on char boundaries.
///
/// `index` is the span's position in the input slice, which doubles as the
/// tie-break when two spans share a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedSpan {
    pub index: usize,
    pub severity: Severity,
    pub start: usize,
    pub end: usize,
}

impl NormalizedSpan {
    /// Jump-target id, `r{start}-{end}`
    pub fn target_id(&self) -> String {
        range_id(self.start, self.end)
    }

    pub fn covers(&self, start: usize, end: usize) -> bool {
        self.start <= start && self.end >= end
    }
}

pub fn range_id(start: usize, end: usize) -> String {
    format!("r{}-{}", start, end)
}

/// Clamp a signed offset into `[0, len]`
pub fn clamp_offset(value: i64, len: usize) -> usize {
    if value <= 0 {
        0
    } else {
        (value as u64).min(len as u64) as usize
    }
}

/// Clamp `span` into `[0, len]`, keeping its label and severity.
///
/// The result may be empty or inverted; see [`normalize_span`] for the
/// renderable form.
pub fn clamp_span(span: &Span, len: usize) -> Span {
    span.with_range(
        clamp_offset(span.start, len) as i64,
        clamp_offset(span.end, len) as i64,
    )
}

/// Renderable form of `span`, or `None` when it is empty after clamping
pub fn normalize_span(index: &Utf16Index, position: usize, span: &Span) -> Option<NormalizedSpan> {
    let len = index.len_utf16();
    let start = index.floor(clamp_offset(span.start, len));
    let end = index.floor(clamp_offset(span.end, len));

    if end <= start {
        tracing::trace!(position, start = span.start, end = span.end, "span not renderable");
        return None;
    }
    Some(NormalizedSpan {
        index: position,
        severity: span.severity,
        start,
        end,
    })
}

/// Renderable spans in input order. Zero-width and inverted spans are
/// silently dropped.
pub fn normalize_spans(index: &Utf16Index, spans: &[Span]) -> Vec<NormalizedSpan> {
    spans
        .iter()
        .enumerate()
        .filter_map(|(position, span)| normalize_span(index, position, span))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clamps_out_of_bounds() {
        let span = Span::new("Arbitration", Severity::High, -3, 1000);
        let clamped = clamp_span(&span, 10);
        assert_eq!((clamped.start, clamped.end), (0, 10));
        assert_eq!(clamped.label, "Arbitration");

        let index = Utf16Index::new("0123456789");
        let normalized = normalize_span(&index, 0, &span).unwrap();
        assert_eq!((normalized.start, normalized.end), (0, 10));
        assert_eq!(normalized.target_id(), "r0-10");
    }

    #[test]
    fn test_drops_zero_width_and_inverted() {
        let index = Utf16Index::new("0123456789");
        let spans = vec![
            Span::new("empty", Severity::High, 4, 4),
            Span::new("inverted", Severity::High, 7, 2),
            Span::new("past end", Severity::High, 12, 20),
            Span::new("before start", Severity::High, -9, -1),
            Span::new("ok", Severity::Low, 2, 5),
        ];
        let normalized = normalize_spans(&index, &spans);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].index, 4);
        assert_eq!((normalized[0].start, normalized[0].end), (2, 5));
    }

    #[test]
    fn test_floors_inside_surrogate_pair() {
        let index = Utf16Index::new("a😀b");
        let span = Span::new("x", Severity::Med, 2, 4);
        let normalized = normalize_span(&index, 0, &span).unwrap();
        assert_eq!((normalized.start, normalized.end), (1, 4));

        // both ends inside the same pair collapse to nothing
        let span = Span::new("x", Severity::Med, 2, 2);
        assert!(normalize_span(&index, 0, &span).is_none());
    }

    #[test]
    fn test_clamp_offset_extremes() {
        assert_eq!(clamp_offset(i64::MIN, 5), 0);
        assert_eq!(clamp_offset(i64::MAX, 5), 5);
        assert_eq!(clamp_offset(3, 5), 3);
    }
}
