//! # Review Data Crate
//!
//! Domain types and static data shared by every stage of the review
//! analysis pipeline.
//!
//! ## Main Components
//!
//! - **types**: `ReviewRecord`, `ReviewText`, `Sentiment`, catalog metadata
//! - **parser**: Turn a review listing page into `ReviewRecord`s
//! - **vocabulary**: The word -> token id table used by the encoder
//! - **error**: Error types for data loading and record validation
//!
//! ## Example Usage
//!
//! ```ignore
//! use review_data::{ReviewPageParser, Vocabulary};
//! use std::path::Path;
//!
//! let vocabulary = Vocabulary::load_from_file(Path::new("models/imdb_word_index.json"))?;
//! let parser = ReviewPageParser::with_defaults()?;
//! let reviews = parser.parse(&html);
//!
//! println!("{} reviews, vocabulary of {}", reviews.len(), vocabulary.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod vocabulary;

// Re-export commonly used types for convenience
pub use error::{DataError, Result, SchemaError};
pub use parser::{ReviewPageParser, ReviewSelectors};
pub use types::{
    MovieDetails,
    MovieId,
    MovieSummary,
    ReviewRecord,
    ReviewText,
    Sentiment,
    SentimentAssessment,
    NEGATIVE_UPPER_BOUND,
    NEUTRAL_UPPER_BOUND,
};
pub use vocabulary::{Vocabulary, INDEX_OFFSET, MAX_BASE_ID, PAD_ID, START_ID, UNKNOWN_ID, UNUSED_ID};
