//! UTF-16 offset mapping
//!
//! Analysis offsets are UTF-16 code units (what the browser indexes strings
//! by), while Rust slices by UTF-8 byte. `Utf16Index` converts between the
//! two. An offset that lands inside a surrogate pair is floored to the start
//! of that character.

#[derive(Debug, Clone)]
pub struct Utf16Index<'a> {
    text: &'a str,
    /// `(utf16 offset, byte offset)` of every char start; empty for ASCII text
    starts: Vec<(usize, usize)>,
    len_utf16: usize,
}

impl<'a> Utf16Index<'a> {
    pub fn new(text: &'a str) -> Self {
        if text.is_ascii() {
            return Self {
                text,
                starts: Vec::new(),
                len_utf16: text.len(),
            };
        }

        let mut starts = Vec::with_capacity(text.len());
        let mut utf16 = 0;
        for (byte, ch) in text.char_indices() {
            starts.push((utf16, byte));
            utf16 += ch.len_utf16();
        }

        Self {
            text,
            starts,
            len_utf16: utf16,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn len_utf16(&self) -> usize {
        self.len_utf16
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn is_ascii(&self) -> bool {
        self.starts.is_empty()
    }

    /// Byte offset for a UTF-16 offset, clamped to the text
    pub fn byte_offset(&self, utf16: usize) -> usize {
        if utf16 >= self.len_utf16 {
            return self.text.len();
        }
        if self.is_ascii() {
            return utf16;
        }
        let idx = self.starts.partition_point(|&(u, _)| u <= utf16);
        self.starts[idx - 1].1
    }

    /// UTF-16 offset for a byte offset, floored to a char boundary
    pub fn utf16_offset(&self, byte: usize) -> usize {
        if byte >= self.text.len() {
            return self.len_utf16;
        }
        if self.is_ascii() {
            return byte;
        }
        let idx = self.starts.partition_point(|&(_, b)| b <= byte);
        self.starts[idx - 1].0
    }

    /// Floor a UTF-16 offset to the nearest char start at or before it
    pub fn floor(&self, utf16: usize) -> usize {
        self.utf16_offset(self.byte_offset(utf16))
    }

    /// Slice `[start, end)` in UTF-16 units
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        let start = self.byte_offset(start);
        let end = self.byte_offset(end).max(start);
        &self.text[start..end]
    }
}
