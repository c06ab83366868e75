//! Protected-span detection.
//!
//! Some spans of chat text are atomic: splitting them produces garbage.
//!
//! ```text
//! "See https://example.com/docs/getting-started for details"
//!                       ↑ split here and neither half is a usable link
//! ```
//!
//! Each class of atomic content is found by an independent [`SpanScanner`].
//! The detector runs every scanner over the full text, then merges the
//! results by sorting on start offset and coalescing any span that overlaps
//! or touches the running one. A URL inside a fenced code block is harmless:
//! the block's span absorbs it during the merge.
//!
//! | Scanner | Matches |
//! |---------|---------|
//! | [`FencedCodeScanner`] | ```` ``` ... ``` ```` blocks, across lines |
//! | [`InlineCodeScanner`] | `` `code` `` within one line |
//! | [`UrlScanner`] | `scheme://...` tokens, `<url>` and `<url\|label>` |
//! | [`ListItemScanner`] | whole lines starting with `-`, `*` or `•` |
//!
//! Adding a new protected class (emoji shortcodes, user mentions) means adding
//! one scanner; see [`PatternScanner`].

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::source::SourceText;
use crate::Result;

static FENCED_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("Invalid fenced code regex"));

static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`\n]+`").expect("Invalid inline code regex"));

// Bare URLs end at whitespace or a bracket character.
static BARE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z][A-Za-z0-9+.\-]*://[^\s<>\[\](){}|]+").expect("Invalid URL regex")
});

// Platform-bracketed links: <https://...> and <https://...|label>
static BRACKETED_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[A-Za-z][A-Za-z0-9+.\-]*:[^\s<>|]+(?:\|[^<>\n]*)?>")
        .expect("Invalid bracketed URL regex")
});

static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*[-*•][ \t]+.*$").expect("Invalid list item regex"));

/// A character range `[start, end)` that must never be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtectedSpan {
    /// Character offset of the first protected character.
    pub start: usize,
    /// Character offset one past the last protected character.
    pub end: usize,
}

impl ProtectedSpan {
    /// Create a span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether the character at `offset` is protected by this span.
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether a boundary at `offset` would cut this span in two.
    #[must_use]
    pub const fn splits_at(&self, offset: usize) -> bool {
        self.start < offset && offset < self.end
    }

    /// Span length in characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A lexical matcher for one class of atomic content.
///
/// Scanners report **byte** ranges, as regex matches do; the detector
/// converts them to character offsets.
pub trait SpanScanner: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Find every protected byte range in `text`.
    fn scan(&self, text: &str) -> Vec<Range<usize>>;
}

fn regex_spans(pattern: &Regex, text: &str) -> Vec<Range<usize>> {
    pattern.find_iter(text).map(|m| m.range()).collect()
}

/// Fenced code blocks delimited by triple backticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FencedCodeScanner;

impl SpanScanner for FencedCodeScanner {
    fn name(&self) -> &'static str {
        "fenced_code"
    }

    fn scan(&self, text: &str) -> Vec<Range<usize>> {
        regex_spans(&FENCED_CODE, text)
    }
}

/// Single-backtick code spans that stay on one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineCodeScanner;

impl SpanScanner for InlineCodeScanner {
    fn name(&self) -> &'static str {
        "inline_code"
    }

    fn scan(&self, text: &str) -> Vec<Range<usize>> {
        regex_spans(&INLINE_CODE, text)
    }
}

/// Bare `scheme://` URLs and bracketed `<url>` / `<url|label>` links.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlScanner;

impl SpanScanner for UrlScanner {
    fn name(&self) -> &'static str {
        "url"
    }

    fn scan(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = regex_spans(&BARE_URL, text);
        spans.extend(regex_spans(&BRACKETED_URL, text));
        spans
    }
}

/// Bulleted list lines (`-`, `*`, `•` followed by whitespace).
#[derive(Debug, Clone, Copy, Default)]
pub struct ListItemScanner;

impl SpanScanner for ListItemScanner {
    fn name(&self) -> &'static str {
        "list_item"
    }

    fn scan(&self, text: &str) -> Vec<Range<usize>> {
        regex_spans(&LIST_ITEM, text)
    }
}

/// A scanner built from a caller-supplied regular expression.
///
/// ```rust
/// use ashlar::{PatternScanner, SpanDetector};
///
/// let emoji = PatternScanner::new("emoji", r":[a-z0-9_+\-]+:").unwrap();
/// let detector = SpanDetector::default().with_scanner(emoji);
///
/// let spans = detector.detect("nice :white_check_mark: work");
/// assert_eq!(spans.len(), 1);
/// assert_eq!((spans[0].start, spans[0].end), (5, 23));
/// ```
#[derive(Debug, Clone)]
pub struct PatternScanner {
    name: &'static str,
    pattern: Regex,
}

impl PatternScanner {
    /// Compile `pattern` into a scanner.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Pattern`] if the regex does not compile.
    pub fn new(name: &'static str, pattern: &str) -> Result<Self> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
        })
    }
}

impl SpanScanner for PatternScanner {
    fn name(&self) -> &'static str {
        self.name
    }

    fn scan(&self, text: &str) -> Vec<Range<usize>> {
        regex_spans(&self.pattern, text)
    }
}

/// Runs a set of scanners and merges their output.
pub struct SpanDetector {
    scanners: Vec<Box<dyn SpanScanner>>,
}

impl SpanDetector {
    /// A detector with no scanners; nothing is protected.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            scanners: Vec::new(),
        }
    }

    /// Add a scanner.
    #[must_use]
    pub fn with_scanner(mut self, scanner: impl SpanScanner + 'static) -> Self {
        self.scanners.push(Box::new(scanner));
        self
    }

    /// Find the merged, sorted, disjoint protected spans of `text`, in
    /// character offsets.
    #[must_use]
    pub fn detect(&self, text: &str) -> Vec<ProtectedSpan> {
        self.detect_in(&SourceText::new(text)).into_vec()
    }

    pub(crate) fn detect_in(&self, source: &SourceText<'_>) -> ProtectedSpans {
        let text = source.slice(0, source.len());
        let mut found = Vec::new();
        for scanner in &self.scanners {
            let ranges = scanner.scan(text);
            tracing::trace!(scanner = scanner.name(), matches = ranges.len(), "scanned");
            found.extend(ranges.into_iter().map(|range| {
                ProtectedSpan::new(source.char_offset(range.start), source.char_offset(range.end))
            }));
        }
        ProtectedSpans::merged(found)
    }
}

impl Default for SpanDetector {
    fn default() -> Self {
        Self::empty()
            .with_scanner(FencedCodeScanner)
            .with_scanner(InlineCodeScanner)
            .with_scanner(UrlScanner)
            .with_scanner(ListItemScanner)
    }
}

impl std::fmt::Debug for SpanDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.scanners.iter().map(|s| s.name()))
            .finish()
    }
}

/// Find protected spans with the default scanner set.
///
/// ```rust
/// let spans = ashlar::find_protected_spans("run `cargo test` then see https://x.io/a");
/// assert_eq!(spans.len(), 2);
/// assert_eq!((spans[0].start, spans[0].end), (4, 16));
/// ```
#[must_use]
pub fn find_protected_spans(text: &str) -> Vec<ProtectedSpan> {
    SpanDetector::default().detect(text)
}

/// A sorted, disjoint set of protected spans.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProtectedSpans {
    spans: Vec<ProtectedSpan>,
}

impl ProtectedSpans {
    /// Sort by start and coalesce spans that overlap or touch.
    pub(crate) fn merged(mut spans: Vec<ProtectedSpan>) -> Self {
        spans.retain(|span| !span.is_empty());
        spans.sort_unstable_by_key(|span| (span.start, span.end));

        let mut merged: Vec<ProtectedSpan> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(running) if span.start <= running.end => {
                    running.end = running.end.max(span.end);
                }
                _ => merged.push(span),
            }
        }
        Self { spans: merged }
    }

    /// The span protecting the character at `offset`, if any.
    pub(crate) fn containing(&self, offset: usize) -> Option<ProtectedSpan> {
        let idx = self.spans.partition_point(|span| span.start <= offset);
        idx.checked_sub(1)
            .map(|i| self.spans[i])
            .filter(|span| span.contains(offset))
    }

    pub(crate) fn is_protected(&self, offset: usize) -> bool {
        self.containing(offset).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.spans.len()
    }

    pub(crate) fn into_vec(self) -> Vec<ProtectedSpan> {
        self.spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(text: &str) -> Vec<(usize, usize)> {
        find_protected_spans(text)
            .into_iter()
            .map(|s| (s.start, s.end))
            .collect()
    }

    #[test]
    fn test_fenced_code_is_one_span() {
        let text = "before\n```\nlet url = \"https://a.b/c\";\n```\nafter";
        let spans = ranges(text);
        assert_eq!(spans, vec![(7, 41)]);
    }

    #[test]
    fn test_inline_code_stays_on_one_line() {
        assert_eq!(ranges("use `foo()` here"), vec![(4, 11)]);
        assert!(ranges("open ` tick\nclose ` tick").is_empty());
    }

    #[test]
    fn test_bare_url_stops_at_whitespace_and_brackets() {
        let text = "see (https://example.com/a/b) now";
        let spans = ranges(text);
        assert_eq!(spans, vec![(5, 28)]);
    }

    #[test]
    fn test_bracketed_url_with_label() {
        let text = "Check <https://slack.com/help/articles/123456|Slack Help Article> today";
        let spans = ranges(text);
        assert_eq!(spans.len(), 1);
        let (start, end) = spans[0];
        let chars: Vec<char> = text.chars().collect();
        assert_eq!(chars[start], '<');
        assert_eq!(chars[end - 1], '>');
    }

    #[test]
    fn test_list_items_cover_whole_lines() {
        let text = "Points:\n- first item\n  * nested item\n• bullet\nplain";
        let spans = ranges(text);
        // Adjacent lines are separated by a newline, so they stay distinct.
        assert_eq!(spans, vec![(8, 20), (21, 36), (37, 45)]);
    }

    #[test]
    fn test_dash_without_space_is_not_a_list() {
        assert!(ranges("---\n-x").is_empty());
    }

    #[test]
    fn test_merge_coalesces_overlap_and_touch() {
        let spans = ProtectedSpans::merged(vec![
            ProtectedSpan::new(10, 20),
            ProtectedSpan::new(0, 5),
            ProtectedSpan::new(5, 8),
            ProtectedSpan::new(15, 30),
            ProtectedSpan::new(40, 40),
        ]);
        assert_eq!(
            spans.into_vec(),
            vec![ProtectedSpan::new(0, 8), ProtectedSpan::new(10, 30)]
        );
    }

    #[test]
    fn test_containing_lookup() {
        let spans =
            ProtectedSpans::merged(vec![ProtectedSpan::new(3, 6), ProtectedSpan::new(9, 12)]);
        assert!(!spans.is_protected(2));
        assert_eq!(spans.containing(3), Some(ProtectedSpan::new(3, 6)));
        assert!(spans.is_protected(5));
        assert!(!spans.is_protected(6));
        assert_eq!(spans.containing(11), Some(ProtectedSpan::new(9, 12)));
        assert!(!spans.is_protected(12));
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let text = "日本 https://例え.jp/パス end";
        let spans = ranges(text);
        assert_eq!(spans, vec![(3, 19)]);
    }

    #[test]
    fn test_empty_detector_protects_nothing() {
        assert!(SpanDetector::empty().detect("`code` https://a.b").is_empty());
    }
}
