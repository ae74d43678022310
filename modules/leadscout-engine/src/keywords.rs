use std::sync::Arc;

use async_trait::async_trait;

use leadscout_common::{Article, DetectionMethod, MatchMode, RuleSet, SignalMap};

use crate::detector::SignalDetector;

/// Evaluate every configured signal against the articles with plain
/// substring matching on the lower-cased corpus. Deterministic: no
/// tokenization, stemming, or word-boundary logic.
pub fn evaluate(articles: &[Article], rules: &RuleSet) -> SignalMap {
    let corpus = build_corpus(articles);

    rules
        .signals
        .iter()
        .map(|(name, def)| {
            let hit = match def.match_mode {
                MatchMode::Any => contains_any(&corpus, &def.keywords),
                // Vacuously true on an empty keyword list.
                MatchMode::All => def
                    .keywords
                    .iter()
                    .all(|k| corpus.contains(&k.to_lowercase())),
                MatchMode::CompetitorDeployment => {
                    contains_any(&corpus, &def.competitors)
                        && contains_any(&corpus, &def.deployment_terms)
                }
            };
            (name.clone(), hit)
        })
        .collect()
}

/// Every article's title and description, concatenated and lower-cased.
fn build_corpus(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|a| format!("{} {}", a.title, a.description))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn contains_any(corpus: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| corpus.contains(&t.to_lowercase()))
}

/// Rule-driven strategy. Deterministic and never abstains, which makes it
/// the terminal fallback in the detector chain.
pub struct KeywordDetector {
    rules: Arc<RuleSet>,
}

impl KeywordDetector {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl SignalDetector for KeywordDetector {
    async fn detect(&self, articles: &[Article], _query: &str) -> Option<SignalMap> {
        Some(evaluate(articles, &self.rules))
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Keywords
    }
}
