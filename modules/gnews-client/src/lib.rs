pub mod error;
pub mod types;

pub use error::{GnewsError, Result};
pub use types::{NewsArticle, RawArticle, SearchResponse};

use std::time::Duration;

use tracing::info;

const BASE_URL: &str = "https://gnews.io/api/v4";

/// Parameters for a single search call.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub language: String,
    pub country: Option<String>,
    pub max_results: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            country: None,
            max_results: 20,
        }
    }
}

pub struct GnewsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GnewsClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: api_key.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// For testing: point the client at a specific base URL (e.g., wiremock).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Search for recent articles matching `query`.
    pub async fn search(&self, query: &str, params: &SearchParams) -> Result<Vec<NewsArticle>> {
        info!(query, max_results = params.max_results, "GNews search");

        let url = format!("{}/search", self.base_url);
        // GNews matches the exact phrase when the query is quoted.
        let quoted = format!("\"{query}\"");
        let max = params.max_results.to_string();
        let country = params.country.as_ref().map(|c| c.to_lowercase());

        let mut pairs: Vec<(&str, &str)> = vec![
            ("q", quoted.as_str()),
            ("lang", params.language.as_str()),
            ("max", max.as_str()),
            ("apikey", self.api_key.as_str()),
        ];
        if let Some(ref country) = country {
            pairs.push(("country", country.as_str()));
        }

        let resp = self.client.get(&url).query(&pairs).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GnewsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: SearchResponse = resp
            .json()
            .await
            .map_err(|e| GnewsError::Parse(e.to_string()))?;

        let articles: Vec<NewsArticle> = data
            .articles
            .into_iter()
            .map(RawArticle::into_normalized)
            .collect();

        info!(query, count = articles.len(), "GNews search complete");
        Ok(articles)
    }
}
