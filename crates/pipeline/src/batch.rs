//! Turn a list of reviews into one padded model input.
//!
//! ## Algorithm
//! 1. Validate every review up front; the first one missing a field fails
//!    the whole batch before any encoding happens
//! 2. Build the encoder input as `title + " " + content`
//! 3. Encode all texts in parallel (output order matches input order)
//! 4. Pad or truncate to the model's fixed width

use crate::encoder::TextEncoder;
use crate::padding::{pad_sequences, PaddedBatch};
use rayon::prelude::*;
use review_data::{ReviewText, SchemaError};
use std::time::Instant;
use tracing::debug;

/// Encodes review batches for a model with a fixed input width
#[derive(Debug, Clone)]
pub struct BatchEncoder {
    encoder: TextEncoder,
    max_len: usize,
}

impl BatchEncoder {
    pub fn new(encoder: TextEncoder, max_len: usize) -> Self {
        Self { encoder, max_len }
    }

    pub fn encoder(&self) -> &TextEncoder {
        &self.encoder
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Validate, encode and pad a batch of reviews.
    ///
    /// Fails with the `SchemaError` of the first review lacking a title or
    /// content. An empty title or content is accepted; only a missing one
    /// is an error.
    pub fn encode_batch(&self, reviews: &[ReviewText<'_>]) -> Result<PaddedBatch, SchemaError> {
        let start = Instant::now();

        let texts = reviews
            .iter()
            .enumerate()
            .map(|(index, review)| compose_text(index, review))
            .collect::<Result<Vec<String>, SchemaError>>()?;

        let sequences: Vec<Vec<u32>> = texts
            .par_iter()
            .map(|text| self.encoder.encode(text))
            .collect();

        let batch = pad_sequences(&sequences, self.max_len);
        debug!(
            "Encoded {} reviews to width {} in {:.2?}",
            batch.batch_size(),
            self.max_len,
            start.elapsed()
        );
        Ok(batch)
    }
}

/// Encoder input for one review: `title + " " + content`
pub fn compose_text(index: usize, review: &ReviewText<'_>) -> Result<String, SchemaError> {
    let title = review.title.ok_or(SchemaError {
        index,
        field: "title",
    })?;
    let content = review.content.ok_or(SchemaError {
        index,
        field: "content",
    })?;
    Ok(format!("{} {}", title, content))
}
