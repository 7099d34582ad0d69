//! Sentiment scoring for review batches.
//!
//! This crate provides:
//! - `SentimentModel`, the trait any inference backend implements
//! - `SequenceClassifier`, a candle implementation loaded from a model
//!   directory (`config.json` + `model.safetensors`)
//! - `SentimentScorer`, which encodes a batch, runs one forward pass and
//!   turns each probability into a rounded score and a label
//!
//! ## Example Usage
//! ```ignore
//! use sentiment::{ModelFiles, SentimentScorer, SequenceClassifier};
//!
//! let model = SequenceClassifier::load(&ModelFiles::from_dir(Path::new("models/sentiment"))?)?;
//! let scorer = SentimentScorer::new(Arc::new(model), vocabulary);
//!
//! let assessments = scorer.score_batch(&[ReviewText::new("Great", "Loved it")])?;
//! ```

pub mod error;
pub mod model;
pub mod classifier;
pub mod scorer;

pub use classifier::{
    ClassifierConfig,
    ModelFiles,
    SequenceClassifier,
    SequenceLayer,
    CONFIG_FILE,
    DEFAULT_MAX_LEN,
    WEIGHTS_FILE,
};
pub use error::{Result, SentimentError};
pub use model::SentimentModel;
pub use scorer::{round_score, SentimentScorer};
