use std::sync::Arc;

use tracing::info;

use leadscout_common::{Article, DetectionMethod, LeadScoutError, RuleSet, SignalMap, Tier};

use crate::detector::{resolve, SignalDetector};
use crate::fetcher::{RetryingFetcher, SearchOptions};
use crate::scoring::score_signals;

/// Result of running one query through retrieval, detection, and scoring.
#[derive(Debug)]
pub struct QueryOutcome {
    pub articles: Vec<Article>,
    /// `None` when retrieval returned nothing and no detector ran.
    pub detection_method: Option<DetectionMethod>,
    pub signals: SignalMap,
    pub score: f64,
    pub tier: Tier,
}

/// Per-query orchestration: fetch articles (with retry), resolve the signal
/// map through the detector chain, aggregate the score. Holds only shared
/// read-only state; everything per-request is created and dropped here.
pub struct SignalPipeline {
    fetcher: RetryingFetcher,
    detectors: Vec<Arc<dyn SignalDetector>>,
    rules: Arc<RuleSet>,
}

impl SignalPipeline {
    pub fn new(
        fetcher: RetryingFetcher,
        detectors: Vec<Arc<dyn SignalDetector>>,
        rules: Arc<RuleSet>,
    ) -> Self {
        Self {
            fetcher,
            detectors,
            rules,
        }
    }

    pub async fn run(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<QueryOutcome, LeadScoutError> {
        let articles = self.fetcher.fetch(query, options).await?;

        if articles.is_empty() {
            info!(query, "No articles retrieved, skipping detection");
            return Ok(QueryOutcome {
                articles,
                detection_method: None,
                signals: self.rules.empty_signals(),
                score: 0.0,
                tier: Tier::Cold,
            });
        }

        let (signals, method) = match resolve(&self.detectors, &articles, query).await {
            Some(resolved) => resolved,
            // Unreachable with a keyword detector at the end of the chain.
            None => (self.rules.empty_signals(), DetectionMethod::Keywords),
        };

        let result = score_signals(&signals, &self.rules);
        info!(
            query,
            method = %method,
            score = result.score,
            tier = %result.tier,
            "Query scored"
        );

        Ok(QueryOutcome {
            articles,
            detection_method: Some(method),
            signals,
            score: result.score,
            tier: result.tier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::NewsSource;
    use crate::keywords::KeywordDetector;
    use crate::retry::RetryPolicy;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::time::Duration;

    const RULES: &str = r#"
name = "t"

[signals.hiring]
type = "trigger"
keywords = ["hiring"]

[signals.layoffs]
type = "negative"
keywords = ["layoffs"]
"#;

    fn rules() -> Arc<RuleSet> {
        Arc::new(RuleSet::from_toml(RULES).unwrap())
    }

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: String::new(),
            url: String::new(),
            published_at: String::new(),
            source: String::new(),
        }
    }

    struct StaticSource {
        articles: Vec<Article>,
    }

    #[async_trait]
    impl NewsSource for StaticSource {
        async fn search(&self, _query: &str, _options: &SearchOptions) -> Result<Vec<Article>> {
            Ok(self.articles.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl NewsSource for FailingSource {
        async fn search(&self, _query: &str, _options: &SearchOptions) -> Result<Vec<Article>> {
            Err(anyhow!("GNews API error (status 500)"))
        }
    }

    /// Proves the short-circuit path: any detect call fails the test.
    struct PanickingDetector;

    #[async_trait]
    impl SignalDetector for PanickingDetector {
        async fn detect(&self, _articles: &[Article], _query: &str) -> Option<SignalMap> {
            panic!("detector must not run for empty retrievals");
        }

        fn method(&self) -> DetectionMethod {
            DetectionMethod::Llm
        }
    }

    struct AbstainingDetector;

    #[async_trait]
    impl SignalDetector for AbstainingDetector {
        async fn detect(&self, _articles: &[Article], _query: &str) -> Option<SignalMap> {
            None
        }

        fn method(&self) -> DetectionMethod {
            DetectionMethod::Llm
        }
    }

    struct FixedDetector {
        signals: SignalMap,
    }

    #[async_trait]
    impl SignalDetector for FixedDetector {
        async fn detect(&self, _articles: &[Article], _query: &str) -> Option<SignalMap> {
            Some(self.signals.clone())
        }

        fn method(&self) -> DetectionMethod {
            DetectionMethod::Llm
        }
    }

    fn fetcher(source: Arc<dyn NewsSource>) -> RetryingFetcher {
        // Zero base delay keeps retry tests from sleeping for real.
        RetryingFetcher::new(
            source,
            RetryPolicy::default().with_base_delay(Duration::ZERO),
        )
    }

    #[tokio::test]
    async fn empty_retrieval_short_circuits_without_detection() {
        let pipeline = SignalPipeline::new(
            fetcher(Arc::new(StaticSource { articles: vec![] })),
            vec![Arc::new(PanickingDetector)],
            rules(),
        );

        let outcome = pipeline
            .run("Acme", &SearchOptions::default())
            .await
            .unwrap();

        assert!(outcome.articles.is_empty());
        assert_eq!(outcome.detection_method, None);
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.tier, Tier::Cold);
        assert_eq!(outcome.signals.len(), 2);
        assert!(outcome.signals.values().all(|v| !v));
    }

    #[tokio::test]
    async fn abstaining_detector_falls_back_to_next() {
        let rules = rules();
        let pipeline = SignalPipeline::new(
            fetcher(Arc::new(StaticSource {
                articles: vec![article("Acme is hiring")],
            })),
            vec![
                Arc::new(AbstainingDetector),
                Arc::new(KeywordDetector::new(rules.clone())),
            ],
            rules,
        );

        let outcome = pipeline
            .run("Acme", &SearchOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome.detection_method, Some(DetectionMethod::Keywords));
        assert_eq!(outcome.signals["hiring"], true);
        assert_eq!(outcome.score, 30.0);
        assert_eq!(outcome.tier, Tier::Warm);
    }

    #[tokio::test]
    async fn first_detector_result_wins() {
        let rules = rules();
        let mut signals = rules.empty_signals();
        signals.insert("layoffs".to_string(), true);

        let pipeline = SignalPipeline::new(
            fetcher(Arc::new(StaticSource {
                articles: vec![article("Acme is hiring")],
            })),
            vec![
                Arc::new(FixedDetector { signals }),
                Arc::new(KeywordDetector::new(rules.clone())),
            ],
            rules,
        );

        let outcome = pipeline
            .run("Acme", &SearchOptions::default())
            .await
            .unwrap();

        // The fixed detector's answer stands even though keywords disagree.
        assert_eq!(outcome.detection_method, Some(DetectionMethod::Llm));
        assert_eq!(outcome.signals["layoffs"], true);
        assert_eq!(outcome.signals["hiring"], false);
        assert_eq!(outcome.score, -20.0);
        assert_eq!(outcome.tier, Tier::Cold);
    }

    #[tokio::test]
    async fn retrieval_failure_propagates_as_retrieval_error() {
        let pipeline = SignalPipeline::new(
            fetcher(Arc::new(FailingSource)),
            vec![Arc::new(PanickingDetector)],
            rules(),
        );

        let err = pipeline
            .run("Acme", &SearchOptions::default())
            .await
            .unwrap_err();

        match err {
            LeadScoutError::Retrieval(msg) => assert!(msg.contains("GNews API error")),
            other => panic!("expected Retrieval error, got {other}"),
        }
    }
}
