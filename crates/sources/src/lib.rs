//! # Sources Crate
//!
//! External data sources for review analysis.
//!
//! ## Components
//!
//! ### Review Fetcher
//! Scrapes one movie's public review listing:
//! - Single GET with a browser-like User-Agent and a request timeout
//! - Non-200 answers are surfaced as `FetchError::Upstream`, never retried
//! - Reviews without body text are dropped; order follows the page
//!
//! ### OMDb Catalog
//! Turns a title query into movie ids and metadata:
//! - `search` returns up to 10 hits in provider order
//! - `details` returns genre, director, plot and rating for one id
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{CatalogConfig, OmdbCatalog, ReviewFetcher};
//!
//! let catalog = OmdbCatalog::new(CatalogConfig { api_key: Some(key), ..Default::default() })?;
//! let movie = catalog.search("The Matrix").await?.remove(0);
//!
//! let fetcher = ReviewFetcher::new()?;
//! let reviews = fetcher.fetch(&movie.id, false).await?;
//! ```

// Public modules
pub mod error;
pub mod reviews;
pub mod catalog;

// Re-export commonly used types
pub use catalog::{CatalogConfig, OmdbCatalog, DEFAULT_OMDB_BASE_URL, MAX_SEARCH_RESULTS};
pub use error::{CatalogError, FetchError, Result};
pub use reviews::{
    FetcherConfig,
    ReviewFetcher,
    BROWSER_USER_AGENT,
    DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_REVIEW_BASE_URL,
};
