//! Unit detection: are the API's offsets word indices or characters?
//!
//! The analysis API does not say. The decision is made once per batch: if
//! at least 70% of spans end at or before the word count, the whole batch is
//! treated as word-indexed. Mixed batches are not representable, so a
//! minority of spans in the other unit will be misread.

use crate::words::WordIndex;
use serde::Serialize;
use shared_types::{Span, SpanUnit};

/// Required share of plausibly word-indexed spans, as `numerator / denominator`
const WORD_MAJORITY: (usize, usize) = (7, 10);

/// Spans converted to character offsets, plus the unit they arrived in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Normalized {
    pub spans: Vec<Span>,
    pub unit: SpanUnit,
}

/// Classify a batch of spans against the text's word index
pub fn detect_unit(words: &WordIndex, spans: &[Span]) -> SpanUnit {
    if spans.is_empty() {
        return SpanUnit::Char;
    }

    let word_count = words.count() as i64;
    let plausible = spans.iter().filter(|s| s.end <= word_count).count();

    // plausible >= ceil(len * 0.7), in exact integer arithmetic
    let (num, den) = WORD_MAJORITY;
    if plausible * den >= spans.len() * num {
        SpanUnit::Word
    } else {
        SpanUnit::Char
    }
}

/// Detect the unit and convert word-indexed spans to character offsets.
///
/// Character-indexed spans pass through untouched; clamping to the text
/// happens later, per segment.
pub fn auto_normalize(text: &str, spans: &[Span]) -> Normalized {
    if spans.is_empty() {
        return Normalized {
            spans: Vec::new(),
            unit: SpanUnit::Char,
        };
    }
    auto_normalize_with(&WordIndex::build(text), spans)
}

/// Same as [`auto_normalize`] with a prebuilt word index
pub fn auto_normalize_with(words: &WordIndex, spans: &[Span]) -> Normalized {
    let unit = detect_unit(words, spans);
    let spans = match unit {
        SpanUnit::Char => spans.to_vec(),
        SpanUnit::Word => spans
            .iter()
            .map(|span| {
                let (start, end) = words.char_range(span.start, span.end);
                span.with_range(start as i64, end as i64)
            })
            .collect(),
    };
    Normalized { spans, unit }
}
