//! Errors raised while loading or running the sentiment classifier.

use review_data::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SentimentError {
    /// The model directory or one of its files does not exist
    #[error("Model artifact not found at {path}")]
    ModelNotFound { path: String },

    /// The artifact exists but could not be read or does not match its config
    #[error("Failed to load model from {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    #[error("Invalid model configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A review handed to the scorer lacks a title or content
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Batch inference failed; no review in the batch was scored
    #[error("Sentiment prediction failed: {reason}")]
    Prediction { reason: String },
}

impl SentimentError {
    pub(crate) fn prediction(reason: impl ToString) -> Self {
        SentimentError::Prediction {
            reason: reason.to_string(),
        }
    }
}

/// Convenience type alias for scoring results
pub type Result<T> = std::result::Result<T, SentimentError>;
