//! Span normalization and highlighting for analysis results
//!
//! Pipeline: raw text + raw spans → unit detection ([`units`]) → clamping
//! ([`normalize`]) → non-overlapping segments ([`segments`]) → render.

pub mod display;
pub mod inpage;
pub mod normalize;
pub mod offsets;
pub mod policy_links;
pub mod segments;
pub mod style;
pub mod units;
pub mod words;

pub use display::{flags_text, sidebar_rows, summary_pills, word_range_label, SidebarRow};
pub use inpage::{plan_text_node, whole_selection_severity, MarkPiece, Range};
pub use normalize::{clamp_span, normalize_spans, NormalizedSpan};
pub use offsets::Utf16Index;
pub use policy_links::{collect_policy_links, score_link, LinkCandidate, RawLink};
pub use segments::{build_segments, Segment};
pub use style::{style_for, HighlightStyle, SeverityStyle};
pub use units::{auto_normalize, auto_normalize_with, detect_unit, Normalized};
pub use words::WordIndex;

use serde::Serialize;
use shared_types::{ApiResult, Severity, SpanUnit, Summary};

/// Everything a document view needs to render one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightReport {
    pub unit: SpanUnit,
    pub unit_label: &'static str,
    pub segments: Vec<Segment>,
    pub rows: Vec<SidebarRow>,
    pub summary: Summary,
}

impl HighlightReport {
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.rows
            .iter()
            .filter(|row| row.span.severity == severity)
            .count()
    }

    pub fn flags_text(&self) -> String {
        flags_text(&self.rows)
    }
}

/// SpanEngine entry point
pub struct SpanEngine;

impl SpanEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run the full pipeline for a text and the result analyzed from it.
    ///
    /// The caller is responsible for pairing them: a result computed for a
    /// different text renders highlights over the wrong content.
    pub fn highlight(&self, text: &str, result: &ApiResult) -> HighlightReport {
        let words = WordIndex::build(text);
        let normalized = auto_normalize_with(&words, &result.spans);
        let segments = build_segments(text, &normalized.spans);
        let rows = sidebar_rows(text, &words, &normalized);

        HighlightReport {
            unit: normalized.unit,
            unit_label: normalized.unit.label(),
            segments,
            rows,
            summary: result.summary.clone(),
        }
    }
}

impl Default for SpanEngine {
    fn default() -> Self {
        Self::new()
    }
}
