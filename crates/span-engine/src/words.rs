//! Word index: maximal runs of non-whitespace, with UTF-16 offsets

use serde::Serialize;

/// Whitespace as the browser's `\s` sees it: Unicode `White_Space` without
/// U+0085 (NEL), plus U+FEFF (BOM). Word offsets from the service are counted
/// with these separators, so a BOM-prefixed paste must not shift them.
pub fn is_word_separator(ch: char) -> bool {
    match ch {
        '\u{85}' => false,
        '\u{feff}' => true,
        _ => ch.is_whitespace(),
    }
}

/// Start/end offsets of every word token in a text, left to right.
///
/// `ends[i]` is one past the last unit of token `i`. Rebuild whenever the
/// text changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WordIndex {
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl WordIndex {
    pub fn build(text: &str) -> Self {
        let mut starts = Vec::new();
        let mut ends = Vec::new();
        let mut pos = 0;
        let mut in_word = false;

        for ch in text.chars() {
            if is_word_separator(ch) {
                if in_word {
                    ends.push(pos);
                    in_word = false;
                }
            } else if !in_word {
                starts.push(pos);
                in_word = true;
            }
            pos += ch.len_utf16();
        }
        if in_word {
            ends.push(pos);
        }

        Self { starts, ends }
    }

    pub fn count(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    pub fn ends(&self) -> &[usize] {
        &self.ends
    }

    /// Index of the word whose start is the greatest one `<= offset`.
    ///
    /// Offsets before the first word (and empty indexes) map to 0.
    pub fn word_at(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// Character range covered by words `[word_start, word_end)`.
    ///
    /// The start index is clamped to `[0, count - 1]` and the end to
    /// `[0, count]`; a clamped end of 0 yields `(0, 0)`.
    pub fn char_range(&self, word_start: i64, word_end: i64) -> (usize, usize) {
        let count = self.count() as i64;
        let w_start = word_start.clamp(0, (count - 1).max(0)) as usize;
        let w_end = word_end.clamp(0, count) as usize;

        let start = self.starts.get(w_start).copied().unwrap_or(0);
        let end = if w_end > 0 { self.ends[w_end - 1] } else { 0 };
        (start, end)
    }
}
