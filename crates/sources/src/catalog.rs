//! Movie metadata lookup against the OMDb API.
//!
//! The analysis core only needs a movie id; this catalog is how a human
//! query ("the matrix") becomes one. Search results keep the provider's
//! order, are capped at `MAX_SEARCH_RESULTS`, and skip untitled entries.

use crate::error::CatalogError;
use reqwest::Client;
use review_data::{MovieDetails, MovieSummary};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com";

/// Upper bound on hits returned by `search`
pub const MAX_SEARCH_RESULTS: usize = 10;

/// OMDb's error message for an empty result set
const NOT_FOUND_MESSAGE: &str = "Movie not found!";

/// OMDb placeholder for a missing field
const NOT_AVAILABLE: &str = "N/A";

// Wire format

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Search", default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type")]
    kind: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

/// Settings for an `OmdbCatalog`
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OMDB_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for the OMDb search and title endpoints
#[derive(Debug, Clone)]
pub struct OmdbCatalog {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OmdbCatalog {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Setup {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Search movies by title
    pub async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::InvalidInput {
                reason: "search query must not be empty".to_string(),
            });
        }

        let response: SearchResponse = self.get_json(&[("s", query), ("type", "movie")]).await?;

        if response.response != "True" {
            let message = response.error.unwrap_or_else(|| "unknown error".to_string());
            if message == NOT_FOUND_MESSAGE {
                info!("No catalog matches for '{}'", query);
                return Ok(Vec::new());
            }
            warn!("Catalog search for '{}' failed: {}", query, message);
            return Err(CatalogError::Provider { message });
        }

        let movies: Vec<MovieSummary> = response
            .search
            .into_iter()
            .filter(|hit| !hit.title.trim().is_empty())
            .take(MAX_SEARCH_RESULTS)
            .map(|hit| MovieSummary {
                id: hit.imdb_id,
                title: hit.title,
                year: available(hit.year),
                kind: available(hit.kind),
                poster: available(hit.poster),
            })
            .collect();

        info!("Catalog search for '{}' returned {} movies", query, movies.len());
        Ok(movies)
    }

    /// Fetch extended metadata for one movie id
    pub async fn details(&self, movie_id: &str) -> Result<MovieDetails, CatalogError> {
        let movie_id = movie_id.trim();
        if movie_id.is_empty() {
            return Err(CatalogError::InvalidInput {
                reason: "movie id must not be empty".to_string(),
            });
        }

        let response: DetailsResponse = self.get_json(&[("i", movie_id), ("plot", "short")]).await?;

        if response.response != "True" {
            return Err(CatalogError::Provider {
                message: response.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        Ok(MovieDetails {
            id: response.imdb_id,
            title: response.title,
            year: available(response.year),
            genres: available(response.genre)
                .map(|g| g.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            director: available(response.director),
            runtime: available(response.runtime),
            plot: available(response.plot),
            imdb_rating: available(response.imdb_rating),
            poster: available(response.poster),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, CatalogError> {
        let api_key = self.api_key.as_deref().ok_or(CatalogError::MissingApiKey)?;
        debug!("Catalog request {:?}", params);

        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .query(params)
            .query(&[("apikey", api_key)])
            .send()
            .await
            .map_err(|e| CatalogError::Upstream {
                status: None,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Upstream {
                status: Some(status.as_u16()),
                reason: format!("OMDb API error: {}", status),
            });
        }

        response.json::<T>().await.map_err(|e| CatalogError::Upstream {
            status: Some(status.as_u16()),
            reason: format!("Malformed catalog response: {}", e),
        })
    }
}

/// Treat OMDb's "N/A" placeholder and blank strings as missing
fn available(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && v != NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_filters_placeholders() {
        assert_eq!(available(Some("N/A".to_string())), None);
        assert_eq!(available(Some("  ".to_string())), None);
        assert_eq!(available(None), None);
        assert_eq!(available(Some("1999".to_string())), Some("1999".to_string()));
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_request() {
        // base url points nowhere; reaching the network would surface as Upstream
        let catalog = OmdbCatalog::new(CatalogConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: Some("   ".to_string()),
            ..CatalogConfig::default()
        })
        .unwrap();

        let err = catalog.search("The Matrix").await.unwrap_err();
        assert!(matches!(err, CatalogError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let catalog = OmdbCatalog::new(CatalogConfig::default()).unwrap();
        let err = catalog.search("  ").await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput { .. }));
    }
}
