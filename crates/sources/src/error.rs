//! Error types for the sources crate.

use review_data::DataError;
use thiserror::Error;

/// Errors raised while fetching a review listing page
#[derive(Error, Debug)]
pub enum FetchError {
    /// Caller passed an unusable movie id; no request was made
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The review site answered with something other than 200, or the
    /// request never completed
    #[error("Upstream error for {url} (status {status:?}): {reason}")]
    Upstream {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// The page selectors could not be compiled
    #[error("Parse setup failed: {0}")]
    Parse(#[from] DataError),

    /// The HTTP client could not be constructed
    #[error("HTTP client setup failed: {reason}")]
    Setup { reason: String },
}

impl FetchError {
    /// Status code returned by the review site, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

/// Errors raised by the movie metadata catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// No API key configured; no request was made
    #[error("Catalog API key is not configured")]
    MissingApiKey,

    #[error("Catalog request failed (status {status:?}): {reason}")]
    Upstream { status: Option<u16>, reason: String },

    /// The catalog answered but reported a failure of its own
    #[error("Catalog error: {message}")]
    Provider { message: String },

    #[error("HTTP client setup failed: {reason}")]
    Setup { reason: String },
}

/// Convenience type alias for review fetching results
pub type Result<T> = std::result::Result<T, FetchError>;
