//! Token-counting oracles.
//!
//! The chunker splits by characters, but embedding models budget by tokens.
//! A [`TokenCounter`] lets the chunker notice when a chunk is token-heavy
//! (dense code, URLs, non-Latin scripts) and shrink it.
//!
//! Counters may fail; a failure only skips validation for that chunk.
//!
//! | Counter | Accuracy | Cost |
//! |---------|----------|------|
//! | [`HeuristicCounter`] | rough | O(n), no model |
//! | `TiktokenCounter` (feature `tiktoken`) | exact for OpenAI models | BPE encode |
//! | any `Fn(&str) -> Result<usize>` | yours | yours |

use unicode_segmentation::UnicodeSegmentation;

use crate::Result;

/// Approximate the subword-token length of a text span.
pub trait TokenCounter: Send + Sync {
    /// Count tokens in `text`.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the backend fails; the chunker
    /// then skips token validation for that chunk.
    fn count_tokens(&self, text: &str) -> Result<usize>;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> Result<usize> + Send + Sync,
{
    fn count_tokens(&self, text: &str) -> Result<usize> {
        self(text)
    }
}

/// Estimates BPE length without a model.
///
/// English averages about 4 characters and 0.75 words per token. The
/// estimate takes the larger of the two readings so punctuation-dense text
/// (URLs, code) is not undercounted.
///
/// ```rust
/// use ashlar::{HeuristicCounter, TokenCounter};
///
/// let tokens = HeuristicCounter.count_tokens("The quick brown fox jumps").unwrap();
/// assert_eq!(tokens, 7);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter;

impl TokenCounter for HeuristicCounter {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        let words = text.unicode_words().count();
        let chars = text.chars().count();
        Ok((words * 4).div_ceil(3).max(chars.div_ceil(4)))
    }
}

#[cfg(feature = "tiktoken")]
pub use bpe::TiktokenCounter;

#[cfg(feature = "tiktoken")]
mod bpe {
    use tiktoken_rs::CoreBPE;

    use super::TokenCounter;
    use crate::{Error, Result};

    /// Exact `cl100k_base` token counts via `tiktoken-rs`.
    pub struct TiktokenCounter {
        bpe: CoreBPE,
    }

    impl TiktokenCounter {
        /// Load the `cl100k_base` encoding.
        ///
        /// # Errors
        ///
        /// Returns [`Error::TokenCount`] if the encoding cannot be loaded.
        pub fn cl100k() -> Result<Self> {
            let bpe = tiktoken_rs::cl100k_base().map_err(|e| Error::TokenCount(e.to_string()))?;
            Ok(Self { bpe })
        }
    }

    impl TokenCounter for TiktokenCounter {
        fn count_tokens(&self, text: &str) -> Result<usize> {
            Ok(self.bpe.encode_with_special_tokens(text).len())
        }
    }

    impl std::fmt::Debug for TiktokenCounter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("TiktokenCounter(cl100k_base)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_heuristic_empty() {
        assert_eq!(HeuristicCounter.count_tokens("").unwrap(), 0);
    }

    #[test]
    fn test_heuristic_url_uses_char_reading() {
        let url = "https://example.com/a/very/long/path/segment";
        let tokens = HeuristicCounter.count_tokens(url).unwrap();
        assert_eq!(tokens, url.chars().count().div_ceil(4));
    }

    #[test]
    fn test_closure_counter() {
        let counter = |text: &str| -> Result<usize> { Ok(text.len()) };
        assert_eq!(counter.count_tokens("abc").unwrap(), 3);

        let failing = |_: &str| -> Result<usize> { Err(Error::TokenCount("offline".into())) };
        assert!(failing.count_tokens("abc").is_err());
    }
}
