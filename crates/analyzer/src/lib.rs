//! Analyzer crate for the reelfeel review sentiment pipeline.
//!
//! This crate wires the review fetcher and the sentiment scorer into one
//! request: fetch a movie's reviews, score them as a batch, return them
//! enriched. It also owns the runtime configuration and the summary
//! statistics shown next to the review list.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod summary;

pub use config::{AnalyzerConfig, DEFAULT_MODEL_DIR, DEFAULT_TIMEOUT_SECS, DEFAULT_VOCABULARY_PATH};
pub use error::{AnalysisError, Result};
pub use orchestrator::ReviewAnalyzer;
pub use summary::{LabelSummary, SentimentSummary};
