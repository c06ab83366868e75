//! Break-point selection.
//!
//! Given a chunk start and a ceiling, pick where the chunk ends. Candidates
//! are ranked:
//!
//! ```text
//! 1. paragraph   "...end.\n\n|Next"
//! 2. sentence    "...end.| Next"     (. ! ? followed by whitespace)
//! 3. line        "...end\n|next"
//! 4. word        "...end |next"
//! ```
//!
//! Only the back half of the window is searched first, so chunks do not come
//! out far below the target. A break is never placed strictly inside a
//! protected span: a span crossing the ceiling is either deferred to the next
//! chunk or, if the chunk starts inside or at it, swallowed whole.

use crate::source::SourceText;
use crate::spans::ProtectedSpans;

/// Rank of a candidate break; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum BreakPriority {
    Paragraph = 1,
    Sentence = 2,
    Line = 3,
    Word = 4,
}

impl BreakPriority {
    /// Classify a break placed just after the character at `offset`.
    fn classify(source: &SourceText<'_>, start: usize, offset: usize) -> Option<Self> {
        let c = source.char_at(offset)?;
        match c {
            '\n' if offset > start && source.char_at(offset - 1) == Some('\n') => {
                Some(Self::Paragraph)
            }
            '.' | '!' | '?' if source.char_at(offset + 1).is_some_and(char::is_whitespace) => {
                Some(Self::Sentence)
            }
            '\n' => Some(Self::Line),
            ' ' => Some(Self::Word),
            _ => None,
        }
    }

    /// Paragraph and sentence breaks end the search immediately.
    fn is_decisive(self) -> bool {
        self <= Self::Sentence
    }
}

/// Find the offset at which the chunk starting at `start` should end.
///
/// Returns a value in `start + 1..=max_end`, except that the end may move past
/// `max_end` to clear a protected span, and equals `source.len()` once the
/// window reaches the end of the text. An empty window returns `start`.
pub(crate) fn find_break_point(
    source: &SourceText<'_>,
    start: usize,
    max_end: usize,
    spans: &ProtectedSpans,
) -> usize {
    let len = source.len();
    if max_end >= len {
        return len;
    }
    if max_end <= start {
        return start;
    }

    let mut ceiling = max_end;
    if let Some(span) = spans.containing(max_end).filter(|s| s.splits_at(max_end)) {
        if span.start > start {
            ceiling = span.start;
        } else {
            tracing::trace!(start, end = span.end, "chunk swallows oversized span");
            return span.end;
        }
    }

    if let Some(end) = scan_back_half(source, start, ceiling, spans) {
        return end;
    }

    // Any unprotected space in the whole window.
    if let Some(offset) = (start..max_end)
        .rev()
        .find(|&i| source.char_at(i) == Some(' ') && !spans.is_protected(i))
    {
        return offset + 1;
    }

    match max_end.checked_sub(1).and_then(|last| spans.containing(last)) {
        Some(span) => span.end,
        None => max_end,
    }
}

fn scan_back_half(
    source: &SourceText<'_>,
    start: usize,
    ceiling: usize,
    spans: &ProtectedSpans,
) -> Option<usize> {
    let floor = start + (ceiling - start) / 2;
    let mut best: Option<(BreakPriority, usize)> = None;

    for offset in (floor..ceiling).rev() {
        if spans.is_protected(offset) {
            continue;
        }
        let Some(priority) = BreakPriority::classify(source, start, offset) else {
            continue;
        };
        if best.map_or(true, |(current, _)| priority < current) {
            best = Some((priority, offset + 1));
            if priority.is_decisive() {
                break;
            }
        }
    }

    best.map(|(priority, end)| {
        tracing::trace!(?priority, start, end, "break point");
        end
    })
}
