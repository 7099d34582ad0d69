//! Aggregate statistics over a scored review set.
//!
//! Records without an assessment are ignored. Standard deviations are
//! sample deviations and are `None` for fewer than two values.

use review_data::{ReviewRecord, Sentiment};
use serde::Serialize;

/// Statistics for the reviews sharing one label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSummary {
    pub sentiment: Sentiment,
    pub count: usize,
    pub mean_score: Option<f64>,
    pub std_score: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    /// Mean review body length in characters
    pub mean_content_length: Option<f64>,
    pub std_content_length: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    /// Number of scored reviews
    pub total: usize,
    pub mean_score: Option<f64>,
    /// One entry per label, in `Sentiment::ALL` order, including empty ones
    pub labels: Vec<LabelSummary>,
}

impl SentimentSummary {
    pub fn from_records(records: &[ReviewRecord]) -> Self {
        let scored: Vec<(Sentiment, f64, f64)> = records
            .iter()
            .filter_map(|r| {
                let assessment = r.assessment?;
                Some((
                    assessment.sentiment,
                    assessment.score,
                    r.content.chars().count() as f64,
                ))
            })
            .collect();

        let all_scores: Vec<f64> = scored.iter().map(|(_, score, _)| *score).collect();

        let labels = Sentiment::ALL
            .iter()
            .map(|&sentiment| {
                let scores: Vec<f64> = scored
                    .iter()
                    .filter(|(s, _, _)| *s == sentiment)
                    .map(|(_, score, _)| *score)
                    .collect();
                let lengths: Vec<f64> = scored
                    .iter()
                    .filter(|(s, _, _)| *s == sentiment)
                    .map(|(_, _, length)| *length)
                    .collect();

                LabelSummary {
                    sentiment,
                    count: scores.len(),
                    mean_score: mean(&scores),
                    std_score: sample_std(&scores),
                    min_score: scores.iter().copied().reduce(f64::min),
                    max_score: scores.iter().copied().reduce(f64::max),
                    mean_content_length: mean(&lengths),
                    std_content_length: sample_std(&lengths),
                }
            })
            .collect();

        Self {
            total: scored.len(),
            mean_score: mean(&all_scores),
            labels,
        }
    }

    pub fn label(&self, sentiment: Sentiment) -> Option<&LabelSummary> {
        self.labels.iter().find(|l| l.sentiment == sentiment)
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        self.label(sentiment).map_or(0, |l| l.count)
    }

    /// Share of reviews with `sentiment`, in percent
    pub fn percentage(&self, sentiment: Sentiment) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(sentiment) as f64 * 100.0 / self.total as f64
    }

    /// Most frequent label; ties go to the earlier label in `Sentiment::ALL`
    pub fn dominant(&self) -> Option<Sentiment> {
        self.labels
            .iter()
            .filter(|l| l.count > 0)
            .fold(None::<&LabelSummary>, |best, l| match best {
                Some(b) if b.count >= l.count => Some(b),
                _ => Some(l),
            })
            .map(|l| l.sentiment)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}
