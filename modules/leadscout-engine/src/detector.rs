use std::sync::Arc;

use async_trait::async_trait;

use leadscout_common::{Article, DetectionMethod, SignalMap};

/// A strategy for evaluating the configured signals against retrieved
/// articles. Returning `None` abstains: the resolver moves on to the next
/// strategy instead of failing the request.
#[async_trait]
pub trait SignalDetector: Send + Sync {
    async fn detect(&self, articles: &[Article], query: &str) -> Option<SignalMap>;
    fn method(&self) -> DetectionMethod;
}

/// Try detectors in order; the first non-abstaining result wins, paired
/// with that detector's method.
pub async fn resolve(
    detectors: &[Arc<dyn SignalDetector>],
    articles: &[Article],
    query: &str,
) -> Option<(SignalMap, DetectionMethod)> {
    for detector in detectors {
        if let Some(signals) = detector.detect(articles, query).await {
            return Some((signals, detector.method()));
        }
    }
    None
}
