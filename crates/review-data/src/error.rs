//! Error types for the review-data crate.
//!
//! Two families live here:
//! - `DataError` covers loading the static vocabulary table and compiling
//!   the page selectors
//! - `SchemaError` is raised when a record handed to the scorer is missing
//!   one of the fields the encoder needs

use thiserror::Error;

/// Errors that can occur while loading static data files
#[derive(Error, Debug)]
pub enum DataError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The file was read but is not the JSON shape we expect
    #[error("Malformed JSON in {path}: {reason}")]
    Json { path: String, reason: String },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A CSS selector used to scrape review pages did not compile
    #[error("Invalid CSS selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// A review record lacks a field required to build the encoder input.
///
/// `index` is the position of the offending record in the batch, so the
/// caller can point at the exact review that broke the contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Review at index {index} is missing required field '{field}'")]
pub struct SchemaError {
    pub index: usize,
    pub field: &'static str,
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataError>;
