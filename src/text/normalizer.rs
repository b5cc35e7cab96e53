//! Message normalization: lowercase, tokenize, filter, stem.

use tracing::trace;

use super::porter::PorterStemmer;
use super::stopwords::is_stopword;
use super::tokenizer::WordTokenizer;

/// Upper bound on re-normalization passes. Real input settles after one or
/// two; the bound only guards against a stemmer cycle.
const MAX_PASSES: usize = 8;

/// Converts raw message text into space-separated lowercase stems.
///
/// The output contains only alphanumeric stems, with stopwords and
/// punctuation removed, in their original order. Normalizing the output
/// again returns it unchanged.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    tokenizer: WordTokenizer,
    stemmer: PorterStemmer,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Create a normalizer using the Porter stemmer.
    pub fn new() -> Self {
        Self {
            tokenizer: WordTokenizer::new(),
            stemmer: PorterStemmer::new(),
        }
    }

    /// Normalize `text`. Never fails; empty input gives empty output.
    pub fn normalize(&self, text: &str) -> String {
        let mut current = self.normalize_pass(text);

        // A stem can itself be a stopword or stem further; repeat until the
        // output is a fixed point of the pass.
        for _ in 1..MAX_PASSES {
            let next = self.normalize_pass(&current);
            if next == current {
                break;
            }
            trace!(before = %current, after = %next, "Normalization pass changed output");
            current = next;
        }

        current
    }

    /// Reduce a single lowercase word to its stem.
    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word)
    }

    fn normalize_pass(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        self.tokenizer
            .tokenize(&lowered)
            .into_iter()
            .filter(|token| is_alphanumeric(token))
            .filter(|token| !is_stopword(token) && !is_punctuation(token))
            .map(|token| self.stem(&token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Every character is a letter or digit (and there is at least one).
fn is_alphanumeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}

/// A single ASCII punctuation character.
fn is_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_punctuation())
}
