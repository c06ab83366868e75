//! Character-offset view over a source string.
//!
//! All chunking arithmetic happens in character offsets so a split can never
//! land inside a multi-byte sequence. Output slabs and regex matches use byte
//! offsets; this view converts between the two.

/// A string indexed by character offset.
#[derive(Debug)]
pub(crate) struct SourceText<'a> {
    text: &'a str,
    chars: Vec<char>,
    /// Byte offset of each char, plus `text.len()` as a sentinel.
    bytes: Vec<usize>,
}

impl<'a> SourceText<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut bytes = Vec::with_capacity(text.len() + 1);
        for (offset, c) in text.char_indices() {
            chars.push(c);
            bytes.push(offset);
        }
        bytes.push(text.len());
        Self { text, chars, bytes }
    }

    /// Length in characters.
    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }

    pub(crate) fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    /// Byte offset of a char offset (`len()` maps to the text's byte length).
    pub(crate) fn byte_offset(&self, offset: usize) -> usize {
        self.bytes[offset.min(self.chars.len())]
    }

    /// Char offset of a byte offset that sits on a char boundary.
    pub(crate) fn char_offset(&self, byte: usize) -> usize {
        self.bytes.binary_search(&byte).unwrap_or_else(|i| i)
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.byte_offset(start)..self.byte_offset(end)]
    }

    /// Shrink `[start, end)` past leading and trailing whitespace.
    pub(crate) fn trim_range(&self, mut start: usize, mut end: usize) -> (usize, usize) {
        while start < end && self.chars[start].is_whitespace() {
            start += 1;
        }
        while end > start && self.chars[end - 1].is_whitespace() {
            end -= 1;
        }
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_round_trip_multibyte() {
        let source = SourceText::new("a日本b");
        assert_eq!(source.len(), 4);
        assert_eq!(source.byte_offset(2), 4);
        assert_eq!(source.char_offset(4), 2);
        assert_eq!(source.byte_offset(4), 8);
        assert_eq!(source.slice(1, 3), "日本");
    }

    #[test]
    fn test_trim_range() {
        let source = SourceText::new("  hi there \n");
        assert_eq!(source.trim_range(0, source.len()), (2, 10));
        assert_eq!(source.trim_range(0, 2), (2, 2));
    }
}
