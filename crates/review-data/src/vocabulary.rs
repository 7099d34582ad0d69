//! Word -> token id table used to encode review text.
//!
//! The base dictionary is the IMDB word index (word -> rank, starting at 1).
//! Every base id is shifted by `INDEX_OFFSET` so the low ids can be reserved
//! for control tokens, which is the layout the classifier was trained with.
//!
//! A `Vocabulary` is built once at startup and never mutated afterwards, so
//! it can be shared behind an `Arc` without locking.

use crate::error::{DataError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Padding token, prepended to short sequences
pub const PAD_ID: u32 = 0;
/// First element of every encoded sequence
pub const START_ID: u32 = 1;
/// Id for words missing from the table
pub const UNKNOWN_ID: u32 = 2;
/// Reserved, never produced by the encoder
pub const UNUSED_ID: u32 = 3;
/// Shift applied to every base dictionary id
pub const INDEX_OFFSET: u32 = 3;
/// Largest base id that still fits after the shift
pub const MAX_BASE_ID: u32 = u32::MAX - INDEX_OFFSET;

const RESERVED_TOKENS: [(&str, u32); 4] = [
    ("<PAD>", PAD_ID),
    ("<START>", START_ID),
    ("<UNK>", UNKNOWN_ID),
    ("<UNUSED>", UNUSED_ID),
];

/// Immutable word -> id mapping
#[derive(Debug, Clone)]
pub struct Vocabulary {
    word_index: HashMap<String, u32>,
}

impl Vocabulary {
    /// Build a vocabulary from the unshifted base dictionary.
    ///
    /// Reserved tokens overwrite any base entry with the same key. Entries
    /// above `MAX_BASE_ID` have no valid shifted id and are left out;
    /// `load_from_file` rejects them instead.
    pub fn from_base_index<I, S>(base: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut word_index: HashMap<String, u32> = base
            .into_iter()
            .filter_map(|(word, id)| id.checked_add(INDEX_OFFSET).map(|id| (word.into(), id)))
            .collect();

        for (token, id) in RESERVED_TOKENS {
            word_index.insert(token.to_string(), id);
        }

        Self { word_index }
    }

    /// Load the base dictionary from a JSON object of `{word: id}` pairs.
    ///
    /// Fails if the file is missing, is not a JSON object of non-negative
    /// integers, or contains an id of 0 (base ids start at 1) or one above
    /// `MAX_BASE_ID`.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DataError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let raw = fs::read_to_string(path)?;
        let base: HashMap<String, u32> =
            serde_json::from_str(&raw).map_err(|e| DataError::Json {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if let Some((word, _)) = base.iter().find(|(_, id)| **id == 0) {
            return Err(DataError::InvalidValue {
                field: "word index".to_string(),
                value: format!("{word} -> 0"),
            });
        }
        if let Some((word, id)) = base.iter().find(|(_, id)| **id > MAX_BASE_ID) {
            return Err(DataError::InvalidValue {
                field: "word index".to_string(),
                value: format!("{word} -> {id} (max {MAX_BASE_ID})"),
            });
        }

        let vocabulary = Self::from_base_index(base);
        info!(
            "Loaded vocabulary with {} entries from {}",
            vocabulary.len(),
            path.display()
        );
        Ok(vocabulary)
    }

    /// Look up a word exactly as given (no case folding)
    pub fn get(&self, word: &str) -> Option<u32> {
        self.word_index.get(word).copied()
    }

    /// Look up a word, falling back to `UNKNOWN_ID`
    pub fn id_or_unknown(&self, word: &str) -> u32 {
        self.get(word).unwrap_or(UNKNOWN_ID)
    }

    /// Number of entries, reserved tokens included
    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }

    /// Largest id in the table; the embedding layer must be at least this big
    pub fn max_id(&self) -> u32 {
        self.word_index.values().copied().max().unwrap_or(UNUSED_ID)
    }
}
