//! Review Fetcher - scrape one movie's review listing page
//!
//! ## Algorithm
//! 1. Validate the movie id (no request is made for an unusable id)
//! 2. Build `{base}/title/{movie_id}/reviews/`, adding `?spoilers=EXCLUDE`
//!    when spoiler-free reviews are requested
//! 3. Issue a single GET with a browser-like User-Agent and a bounded timeout
//! 4. Anything other than 200 is an upstream error; there is no retry
//! 5. Parse the page into `ReviewRecord`s in document order
//!
//! A page that parses to zero reviews is a successful fetch with an empty
//! result. Callers that need "nothing to analyze" to be distinct from
//! "fetch failed" get that from the `Result`, not from inspecting logs.

use crate::error::{FetchError, Result};
use reqwest::{Client, StatusCode};
use review_data::{ReviewPageParser, ReviewRecord, ReviewSelectors};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Review site serving `/title/{id}/reviews/`
pub const DEFAULT_REVIEW_BASE_URL: &str = "https://www.imdb.com";

/// Some providers reject default client agents, so we present as a browser
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.3; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.162 Safari/537.36";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SPOILER_FREE_QUERY: &str = "?spoilers=EXCLUDE";

/// Settings for a `ReviewFetcher`
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub selectors: ReviewSelectors,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REVIEW_BASE_URL.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            selectors: ReviewSelectors::default(),
        }
    }
}

impl FetcherConfig {
    /// Point the fetcher at a different host (default: the public review site)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Configure the per-request timeout (default: 30s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Fetches and parses review listing pages.
///
/// Cheap to clone: the HTTP client is reference counted internally and the
/// compiled selectors are small.
#[derive(Debug, Clone)]
pub struct ReviewFetcher {
    client: Client,
    base_url: String,
    parser: ReviewPageParser,
}

impl ReviewFetcher {
    /// Create a fetcher for the public review site
    pub fn new() -> Result<Self> {
        Self::with_config(FetcherConfig::default())
    }

    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Setup {
                reason: e.to_string(),
            })?;
        let parser = ReviewPageParser::new(&config.selectors)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            parser,
        })
    }

    /// Build the listing URL for a movie.
    ///
    /// Fails with `InvalidInput` for an empty id or one containing anything
    /// other than ASCII letters and digits.
    pub fn review_url(&self, movie_id: &str, spoiler_free: bool) -> Result<String> {
        let movie_id = validate_movie_id(movie_id)?;
        let mut url = format!("{}/title/{}/reviews/", self.base_url, movie_id);
        if spoiler_free {
            url.push_str(SPOILER_FREE_QUERY);
        }
        Ok(url)
    }

    /// Fetch and parse the reviews for one movie.
    ///
    /// Returns the reviews that have body text, in page order.
    #[instrument(skip(self))]
    pub async fn fetch(&self, movie_id: &str, spoiler_free: bool) -> Result<Vec<ReviewRecord>> {
        let url = self.review_url(movie_id, spoiler_free)?;
        let start = Instant::now();
        debug!("Requesting {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            FetchError::Upstream {
                url: url.clone(),
                status: None,
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Review page {} answered {}", url, status);
            return Err(FetchError::Upstream {
                url,
                status: Some(status.as_u16()),
                reason: format!("Failed to fetch page: {}", status),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Upstream {
            url: url.clone(),
            status: Some(status.as_u16()),
            reason: format!("Failed to read body: {}", e),
        })?;

        let reviews = self.parser.parse(&body);
        info!(
            "Fetched {} reviews for {} in {:.2?}",
            reviews.len(),
            movie_id,
            start.elapsed()
        );
        Ok(reviews)
    }
}

fn validate_movie_id(movie_id: &str) -> Result<&str> {
    let trimmed = movie_id.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidInput {
            reason: "movie id must not be empty".to_string(),
        });
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FetchError::InvalidInput {
            reason: format!("movie id '{}' contains unsupported characters", movie_id),
        });
    }
    Ok(trimmed)
}
