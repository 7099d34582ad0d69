//! # Review Analyzer
//!
//! Coordinates one analysis request:
//! 1. Fetch the movie's review page
//! 2. Fail with `NoReviews` if nothing usable came back
//! 3. Score every review in a single batch on the blocking pool
//! 4. Return the records in page order, each with score and label
//!
//! The steps run strictly in sequence. Nothing is cached, so analyzing the
//! same movie twice fetches and scores twice.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use review_data::{ReviewRecord, Vocabulary};
use sentiment::{ModelFiles, SentimentError, SentimentScorer, SequenceClassifier};
use sources::ReviewFetcher;

/// Fetch-then-score pipeline for one movie at a time
#[derive(Clone)]
pub struct ReviewAnalyzer {
    fetcher: ReviewFetcher,
    scorer: SentimentScorer,
}

impl ReviewAnalyzer {
    /// Assemble an analyzer from ready-made parts
    pub fn new(fetcher: ReviewFetcher, scorer: SentimentScorer) -> Self {
        Self { fetcher, scorer }
    }

    /// Load the vocabulary and model and build the HTTP client.
    ///
    /// This is the startup step: a missing or broken artifact fails here,
    /// before any request is served.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();

        let vocabulary = Arc::new(load_vocabulary(&config.vocabulary_path)?);
        let model = SequenceClassifier::load(&ModelFiles::from_dir(&config.model_dir)?)?;

        let vocab_size = model.config().vocab_size;
        if vocabulary.max_id() as usize >= vocab_size {
            warn!(
                "Vocabulary ids reach {} but the model only embeds {}; rarer words will be scored as unknown",
                vocabulary.max_id(),
                vocab_size
            );
        }

        let scorer = SentimentScorer::new(Arc::new(model), vocabulary);
        let fetcher = ReviewFetcher::with_config(config.fetcher_config())?;

        info!("Analyzer ready in {:.2?}", start.elapsed());
        Ok(Self::new(fetcher, scorer))
    }

    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    pub fn fetcher(&self) -> &ReviewFetcher {
        &self.fetcher
    }

    /// Analyze all reviews of a movie, spoilers included
    pub async fn analyze(&self, movie_id: &str) -> Result<Vec<ReviewRecord>> {
        self.analyze_with_options(movie_id, false).await
    }

    /// Main entry point: fetch and score one movie's reviews.
    ///
    /// # Returns
    /// * `Ok(records)` - Every fetched review, in page order, scored
    /// * `Err(Fetch)` - Bad movie id or the review site failed
    /// * `Err(NoReviews)` - The page loaded but had no reviews with text
    /// * `Err(Scoring)` - The batch could not be scored
    #[instrument(skip(self))]
    pub async fn analyze_with_options(
        &self,
        movie_id: &str,
        spoiler_free: bool,
    ) -> Result<Vec<ReviewRecord>> {
        let start_time = Instant::now();

        let mut reviews = self.fetcher.fetch(movie_id, spoiler_free).await?;
        if reviews.is_empty() {
            warn!("No reviews to analyze for {}", movie_id);
            return Err(AnalysisError::NoReviews {
                movie_id: movie_id.to_string(),
            });
        }
        info!("Fetched {} reviews for {}", reviews.len(), movie_id);

        // Inference is CPU-bound; keep it off the async workers
        let scorer = self.scorer.clone();
        let reviews = tokio::task::spawn_blocking(move || {
            scorer.score_records(&mut reviews).map(|()| reviews)
        })
        .await
        .map_err(|e| SentimentError::Prediction {
            reason: format!("scoring task failed: {}", e),
        })??;

        info!(
            "Analyzed {} reviews for {} in {:.2?}",
            reviews.len(),
            movie_id,
            start_time.elapsed()
        );
        Ok(reviews)
    }
}

fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    Ok(Vocabulary::load_from_file(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Router;
    use pipeline::PaddedBatch;
    use review_data::{ReviewText, SchemaError, Sentiment, PAD_ID};
    use sentiment::SentimentModel;
    use sources::{FetchError, FetcherConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Scores a row by how many of its tokens are the "good" id
    struct CountingModel {
        good_id: u32,
        calls: AtomicUsize,
        fail: bool,
    }

    impl SentimentModel for CountingModel {
        fn name(&self) -> &str {
            "counting"
        }

        fn max_len(&self) -> usize {
            8
        }

        fn predict(&self, batch: &PaddedBatch) -> sentiment::Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SentimentError::Prediction {
                    reason: "backend unavailable".to_string(),
                });
            }
            Ok(batch
                .rows()
                .map(|row| {
                    let tokens = row.iter().filter(|&&id| id != PAD_ID).count() as f32;
                    let good = row.iter().filter(|&&id| id == self.good_id).count() as f32;
                    good / tokens
                })
                .collect())
        }
    }

    struct Upstream {
        base_url: String,
        calls: Arc<AtomicUsize>,
    }

    async fn start_upstream(status: u16, body: String) -> Upstream {
        let calls = Arc::new(AtomicUsize::new(0));
        let status = StatusCode::from_u16(status).unwrap();
        let app = Router::new()
            .fallback(|State((calls, status, body)): State<(Arc<AtomicUsize>, StatusCode, String)>| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                (status, body)
            })
            .with_state((calls.clone(), status, body));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Upstream {
            base_url: format!("http://{}", addr),
            calls,
        }
    }

    fn card(title: Option<&str>, content: &str) -> String {
        let title = title
            .map(|t| format!(r#"<h3 class="ipc-title__text ipc-title__text--reduced">{t}</h3>"#))
            .unwrap_or_default();
        format!(
            r#"<div class="ipc-list-card__content">{title}<div class="ipc-html-content-inner-div">{content}</div></div>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body>{}</body></html>", cards.concat())
    }

    fn build_analyzer(base_url: &str, fail: bool) -> (ReviewAnalyzer, Arc<CountingModel>) {
        let vocabulary = Vocabulary::from_base_index([("good", 49), ("bad", 75)]);
        let good_id = vocabulary.get("good").unwrap();
        let model = Arc::new(CountingModel {
            good_id,
            calls: AtomicUsize::new(0),
            fail,
        });
        let scorer = SentimentScorer::new(model.clone(), Arc::new(vocabulary));
        let fetcher = ReviewFetcher::with_config(FetcherConfig::default().with_base_url(base_url)).unwrap();
        (ReviewAnalyzer::new(fetcher, scorer), model)
    }

    fn three_reviews() -> String {
        page(&[
            card(Some("good"), "good good good"),
            card(Some("bad"), "bad bad"),
            card(Some("so so"), "good bad"),
        ])
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[tokio::test]
    async fn test_analyze_scores_in_page_order() {
        let upstream = start_upstream(200, three_reviews()).await;
        let (analyzer, model) = build_analyzer(&upstream.base_url, false);

        let records = analyzer.analyze("tt0133093").await.unwrap();

        assert_eq!(records.len(), 3);
        // [START good good good good] -> 4/5
        assert_eq!(records[0].score(), Some(0.8));
        assert_eq!(records[0].sentiment(), Some(Sentiment::Positive));
        // [START bad bad bad] -> 0/4
        assert_eq!(records[1].score(), Some(0.0));
        assert_eq!(records[1].sentiment(), Some(Sentiment::Negative));
        // [START so so good bad] -> 1/5
        assert_eq!(records[2].score(), Some(0.2));
        assert!(records.iter().all(|r| r.is_scored()));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_analyze_is_idempotent() {
        let upstream = start_upstream(200, three_reviews()).await;
        let (analyzer, _) = build_analyzer(&upstream.base_url, false);

        let first = analyzer.analyze("tt0133093").await.unwrap();
        let second = analyzer.analyze("tt0133093").await.unwrap();

        assert_eq!(first, second);
        // no caching
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_page_is_no_reviews() {
        let upstream = start_upstream(200, page(&[])).await;
        let (analyzer, model) = build_analyzer(&upstream.base_url, false);

        let err = analyzer.analyze("tt0133093").await.unwrap_err();

        assert!(matches!(err, AnalysisError::NoReviews { ref movie_id } if movie_id == "tt0133093"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_untitled_review_fails_whole_movie() {
        let upstream = start_upstream(
            200,
            page(&[card(Some("good"), "good"), card(None, "bad bad")]),
        )
        .await;
        let (analyzer, model) = build_analyzer(&upstream.base_url, false);

        let err = analyzer.analyze("tt0133093").await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Scoring(SentimentError::Schema(SchemaError { index: 1, field: "title" }))
        ));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_no_reviews() {
        let upstream = start_upstream(503, String::new()).await;
        let (analyzer, _) = build_analyzer(&upstream.base_url, false);

        let err = analyzer.analyze("tt0133093").await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Fetch(FetchError::Upstream { status: Some(503), .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_movie_id_never_hits_upstream() {
        let upstream = start_upstream(200, three_reviews()).await;
        let (analyzer, _) = build_analyzer(&upstream.base_url, false);

        let err = analyzer.analyze("").await.unwrap_err();

        assert!(matches!(err, AnalysisError::Fetch(FetchError::InvalidInput { .. })));
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prediction_error_propagates_unchanged() {
        let upstream = start_upstream(200, three_reviews()).await;
        let (analyzer, _) = build_analyzer(&upstream.base_url, true);

        let err = analyzer.analyze("tt0133093").await.unwrap_err();

        match err {
            AnalysisError::Scoring(SentimentError::Prediction { reason }) => {
                assert_eq!(reason, "backend unavailable")
            }
            other => panic!("expected prediction error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_model() {
        let upstream = start_upstream(200, three_reviews()).await;
        let (analyzer, model) = build_analyzer(&upstream.base_url, false);

        let (a, b) = tokio::join!(analyzer.analyze("tt1"), analyzer.analyze("tt2"));

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_scorer_is_reachable_for_direct_use() {
        let (analyzer, _) = build_analyzer("http://127.0.0.1:1", false);
        let assessments = analyzer
            .scorer()
            .score_batch(&[ReviewText::new("good", "good")])
            .unwrap();
        assert_eq!(assessments[0].sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_from_config_fails_fast_on_missing_vocabulary() {
        let config = AnalyzerConfig {
            vocabulary_path: "no/such/word_index.json".into(),
            ..AnalyzerConfig::default()
        };
        let err = ReviewAnalyzer::from_config(&config).err().unwrap();
        assert!(matches!(err, AnalysisError::Vocabulary(_)));
    }
}
