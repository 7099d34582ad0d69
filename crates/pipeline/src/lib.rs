//! Text preparation for the sentiment classifier.
//!
//! This crate provides:
//! - `TextEncoder` for turning review text into token ids
//! - `pad_sequences` / `PaddedBatch` for fixing sequences to the model width
//! - `BatchEncoder` for validating and encoding a whole movie's reviews
//!
//! ## Architecture
//! Reviews go through the pipeline in stages:
//! 1. Each review is checked for a title and content
//! 2. `title + " " + content` is lowercased, split and mapped to ids
//! 3. Sequences are left-padded (or tail-truncated) to one width
//! 4. The resulting batch goes to the classifier in a single call
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{BatchEncoder, TextEncoder};
//! use review_data::{ReviewText, Vocabulary};
//!
//! let vocabulary = Arc::new(Vocabulary::load_from_file(path)?);
//! let encoder = BatchEncoder::new(TextEncoder::new(vocabulary), 200);
//!
//! let texts: Vec<ReviewText> = reviews.iter().map(|r| r.as_text()).collect();
//! let batch = encoder.encode_batch(&texts)?;
//! ```

pub mod encoder;
pub mod padding;
pub mod batch;

// Re-export main types
pub use batch::{compose_text, BatchEncoder};
pub use encoder::TextEncoder;
pub use padding::{pad_sequences, PaddedBatch};
