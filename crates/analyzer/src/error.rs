//! Error type for one analysis request.
//!
//! Lower layers' errors are wrapped, not rewritten, so a caller can tell an
//! upstream failure (`Fetch`) from a page with nothing on it (`NoReviews`)
//! from a model failure (`Scoring`).

use review_data::DataError;
use sentiment::SentimentError;
use sources::FetchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Failed to load vocabulary: {0}")]
    Vocabulary(#[from] DataError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The page was fetched but held no review with body text
    #[error("No reviews found for movie {movie_id}")]
    NoReviews { movie_id: String },

    #[error(transparent)]
    Scoring(#[from] SentimentError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
