use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use gnews_client::{GnewsClient, SearchParams};
use leadscout_common::{Article, LeadScoutError};

use crate::retry::{DelaySource, RetryPolicy, TokioDelay};

/// Options for one retrieval request.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub language: String,
    pub country: Option<String>,
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            country: None,
            max_results: 20,
        }
    }
}

// --- NewsSource trait ---

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Article>>;
}

#[async_trait]
impl NewsSource for GnewsClient {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<Article>> {
        let params = SearchParams {
            language: options.language.clone(),
            country: options.country.clone(),
            max_results: options.max_results,
        };

        let articles = GnewsClient::search(self, query, &params).await?;

        Ok(articles
            .into_iter()
            .map(|a| Article {
                title: a.title,
                description: a.description,
                url: a.url,
                published_at: a.published_at,
                source: a.source,
            })
            .collect())
    }
}

// --- Retrying fetcher ---

/// Fetches the article list for a query, retrying transient upstream
/// failures with exponential backoff. All-or-nothing: a request either
/// yields the full list or fails after exhausting the policy.
pub struct RetryingFetcher {
    source: Arc<dyn NewsSource>,
    policy: RetryPolicy,
    delay: Arc<dyn DelaySource>,
}

impl RetryingFetcher {
    pub fn new(source: Arc<dyn NewsSource>, policy: RetryPolicy) -> Self {
        Self {
            source,
            policy,
            delay: Arc::new(TokioDelay),
        }
    }

    pub fn with_delay_source(mut self, delay: Arc<dyn DelaySource>) -> Self {
        self.delay = delay;
        self
    }

    pub async fn fetch(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Article>, LeadScoutError> {
        self.policy
            .run(&*self.delay, || self.source.search(query, options))
            .await
            .map_err(|e| LeadScoutError::Retrieval(e.to_string()))
    }
}
