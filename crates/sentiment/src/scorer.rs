//! Batch sentiment scoring.
//!
//! ## Algorithm
//! 1. Validate and encode every review into one padded batch
//! 2. Run a single forward pass over the whole batch
//! 3. Round each probability to 4 decimal places
//! 4. Label the rounded score: <= 0.4 negative, <= 0.6 neutral, else positive
//!
//! Any failure in steps 1-2 fails the whole batch. There is no partial
//! result: either every review gets an assessment or none does.

use crate::error::{Result, SentimentError};
use crate::model::SentimentModel;
use pipeline::{BatchEncoder, TextEncoder};
use review_data::{ReviewRecord, ReviewText, SentimentAssessment, Vocabulary};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

const SCORE_DECIMALS: i32 = 4;

/// Scores review batches with a shared model and vocabulary.
///
/// Cheap to clone and safe to share across threads: both the model and
/// the vocabulary are immutable after construction.
#[derive(Clone)]
pub struct SentimentScorer {
    model: Arc<dyn SentimentModel>,
    encoder: BatchEncoder,
}

impl SentimentScorer {
    pub fn new(model: Arc<dyn SentimentModel>, vocabulary: Arc<Vocabulary>) -> Self {
        let encoder = BatchEncoder::new(TextEncoder::new(vocabulary), model.max_len());
        Self { model, encoder }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn max_len(&self) -> usize {
        self.encoder.max_len()
    }

    /// Score a batch of reviews.
    ///
    /// # Returns
    /// * `Ok(Vec<SentimentAssessment>)` - One per review, in input order
    /// * `Err(Schema)` - A review lacks its title or content
    /// * `Err(Prediction)` - Inference failed or returned unusable output
    pub fn score_batch(&self, reviews: &[ReviewText<'_>]) -> Result<Vec<SentimentAssessment>> {
        let batch = self.encoder.encode_batch(reviews)?;
        if batch.is_empty() {
            debug!("Empty review batch, skipping inference");
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let predictions = self.model.predict(&batch).map_err(|e| {
            error!("Model {} failed on {} reviews: {}", self.model.name(), reviews.len(), e);
            e
        })?;

        if predictions.len() != reviews.len() {
            error!(
                "Mismatch in number of predictions: expected {}, got {}",
                reviews.len(),
                predictions.len()
            );
            return Err(SentimentError::prediction(format!(
                "expected {} predictions, got {}",
                reviews.len(),
                predictions.len()
            )));
        }

        let assessments = predictions
            .into_iter()
            .enumerate()
            .map(|(index, raw)| assess(index, raw))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Scored {} reviews with {} in {:.2?}",
            assessments.len(),
            self.model.name(),
            start.elapsed()
        );
        Ok(assessments)
    }

    /// Score records in place.
    ///
    /// Records are only touched once the whole batch has been scored, so
    /// on error every record is left exactly as it was.
    pub fn score_records(&self, records: &mut [ReviewRecord]) -> Result<()> {
        let assessments = {
            let texts: Vec<ReviewText<'_>> = records.iter().map(ReviewRecord::as_text).collect();
            self.score_batch(&texts)?
        };

        for (record, assessment) in records.iter_mut().zip(assessments) {
            record.assessment = Some(assessment);
        }
        Ok(())
    }
}

/// Round a model probability to the stored precision
pub fn round_score(raw: f32) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (f64::from(raw) * factor).round() / factor
}

fn assess(index: usize, raw: f32) -> Result<SentimentAssessment> {
    if !raw.is_finite() || !(0.0..=1.0).contains(&raw) {
        return Err(SentimentError::prediction(format!(
            "prediction {} for review {} is outside [0, 1]",
            raw, index
        )));
    }
    Ok(SentimentAssessment::from_score(round_score(raw)))
}
