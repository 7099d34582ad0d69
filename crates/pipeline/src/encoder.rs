//! Word-level text encoder.
//!
//! Text is lowercased and split on whitespace, nothing more. Punctuation
//! stays attached to its word ("great!" and "great" are different tokens)
//! because that is how the classifier's vocabulary was built.

use review_data::{Vocabulary, START_ID};
use std::sync::Arc;

/// Converts review text into a variable-length token id sequence.
///
/// Holds the vocabulary behind an `Arc`; cloning an encoder is cheap and
/// every clone reads the same table.
#[derive(Debug, Clone)]
pub struct TextEncoder {
    vocabulary: Arc<Vocabulary>,
}

impl TextEncoder {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Encode text as `[START_ID, id(token_1), ..., id(token_n)]`.
    ///
    /// Words missing from the vocabulary map to `UNKNOWN_ID`. The output is
    /// never empty and is not padded.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        let mut ids = Vec::with_capacity(1 + text.len() / 5);
        ids.push(START_ID);
        ids.extend(
            text.split_whitespace()
                .map(|token| self.vocabulary.id_or_unknown(&token.to_lowercase())),
        );
        ids
    }
}
