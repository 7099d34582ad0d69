//! Core domain types for review analysis.
//!
//! This module defines the records that flow through the system:
//! - `ReviewRecord`: one scraped audience review, optionally enriched
//! - `ReviewText`: the borrowed view of a record the scorer consumes
//! - `Sentiment` / `SentimentAssessment`: the scorer's verdict
//! - `MovieSummary` / `MovieDetails`: catalog metadata used to find a movie id

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a movie on the review site (e.g. "tt0133093")
pub type MovieId = String;

// =============================================================================
// Sentiment
// =============================================================================

/// Scores at or below this value are labelled negative
pub const NEGATIVE_UPPER_BOUND: f64 = 0.4;

/// Scores above `NEGATIVE_UPPER_BOUND` and at or below this value are neutral
pub const NEUTRAL_UPPER_BOUND: f64 = 0.6;

/// Discrete three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// All labels, in the order reports list them
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Map a continuous score to a label.
    ///
    /// Buckets are evaluated low to high and each boundary belongs to the
    /// lower bucket: exactly 0.4 is negative, exactly 0.6 is neutral.
    pub fn from_score(score: f64) -> Self {
        if score <= NEGATIVE_UPPER_BOUND {
            Sentiment::Negative
        } else if score <= NEUTRAL_UPPER_BOUND {
            Sentiment::Neutral
        } else {
            Sentiment::Positive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and label produced together by the scorer.
///
/// Keeping both in one value means a record is either fully scored or not
/// scored at all; there is no way to set one without the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentAssessment {
    /// Model output in [0, 1], rounded to 4 decimal places
    pub score: f64,
    pub sentiment: Sentiment,
}

impl SentimentAssessment {
    pub fn from_score(score: f64) -> Self {
        Self {
            score,
            sentiment: Sentiment::from_score(score),
        }
    }
}

// =============================================================================
// Reviews
// =============================================================================

/// One audience review scraped from the review listing page.
///
/// Serialises to the flat `{title, content, rating, score, sentiment}` shape
/// handed to presentation code; `score` and `sentiment` are omitted until
/// the record has been scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub title: Option<String>,
    /// Review body; never empty for records produced by the fetcher
    pub content: String,
    /// Star rating exactly as the site renders it (not normalised)
    pub rating: Option<String>,
    #[serde(flatten)]
    pub assessment: Option<SentimentAssessment>,
}

impl ReviewRecord {
    pub fn new(title: Option<String>, content: impl Into<String>, rating: Option<String>) -> Self {
        Self {
            title,
            content: content.into(),
            rating,
            assessment: None,
        }
    }

    /// Attach the scorer's verdict, consuming the unscored record
    pub fn with_assessment(mut self, assessment: SentimentAssessment) -> Self {
        self.assessment = Some(assessment);
        self
    }

    pub fn is_scored(&self) -> bool {
        self.assessment.is_some()
    }

    pub fn score(&self) -> Option<f64> {
        self.assessment.map(|a| a.score)
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.assessment.map(|a| a.sentiment)
    }

    /// Borrowed view used as scorer input.
    ///
    /// A missing title stays missing, so the scorer rejects the batch with
    /// a `SchemaError` naming this record.
    pub fn as_text(&self) -> ReviewText<'_> {
        ReviewText {
            title: self.title.as_deref(),
            content: Some(self.content.as_str()),
        }
    }
}

/// Title and content of a review as seen by the scorer.
///
/// Both fields are optional here because this is the boundary where
/// malformed input is detected; the scorer rejects any entry with a
/// missing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewText<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
}

impl<'a> ReviewText<'a> {
    pub fn new(title: &'a str, content: &'a str) -> Self {
        Self {
            title: Some(title),
            content: Some(content),
        }
    }
}

// =============================================================================
// Catalog metadata
// =============================================================================

/// One hit from a movie catalog search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    /// Year as the catalog reports it; may be a range such as "2011-2019"
    pub year: Option<String>,
    pub kind: Option<String>,
    pub poster: Option<String>,
}

/// Extended metadata for a single movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    pub year: Option<String>,
    pub genres: Vec<String>,
    pub director: Option<String>,
    pub runtime: Option<String>,
    pub plot: Option<String>,
    pub imdb_rating: Option<String>,
    pub poster: Option<String>,
}
