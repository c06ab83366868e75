//! The Slab type: a chunk of text with position metadata.

/// A chunk of text with its position in the original document.
///
/// ## Byte Offsets
///
/// `start` and `end` are byte offsets into the original text, always on char
/// boundaries, so the source region can be recovered by slicing:
///
/// ```rust
/// use ashlar::Slab;
///
/// let text = "Hello, world!";
/// let slab = Slab::new("world", 7, 12, 0);
///
/// assert_eq!(&text[slab.start..slab.end], "world");
/// ```
///
/// Sizes used by the chunker (target, overlap, minimum) are measured in
/// characters; see [`Slab::char_len`].
///
/// ## Merged Slabs
///
/// When undersized slabs are fused, the span becomes the union of both spans
/// and the texts are joined by a single space. The text of a merged slab is
/// therefore not always a verbatim slice of the source:
///
/// ```text
/// Source:  "Hi.\n\nThere."
/// Slab 0:  "Hi."      [0..3]
/// Slab 1:  "There."   [5..11]
/// Merged:  "Hi. There."  [0..11]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slab {
    /// The chunk text.
    pub text: String,
    /// Byte offset where this chunk starts in the original document.
    pub start: usize,
    /// Byte offset where this chunk ends (exclusive) in the original document.
    pub end: usize,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
}

impl Slab {
    /// Create a new slab.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
        }
    }

    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// The length of this chunk in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The byte span of this chunk in the original document.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Append `other` to this slab, joined by one space.
    pub(crate) fn absorb(&mut self, other: Slab) {
        self.text.push(' ');
        self.text.push_str(&other.text);
        self.start = self.start.min(other.start);
        self.end = self.end.max(other.end);
    }
}

impl std::fmt::Display for Slab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Slab {{ index: {}, span: {}..{}, len: {} }}",
            self.index,
            self.start,
            self.end,
            self.len()
        )
    }
}
