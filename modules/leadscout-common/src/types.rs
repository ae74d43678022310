use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A news article normalized for signal evaluation.
/// Fields may be empty strings but are never absent.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: String,
    pub source: String,
}

/// Per-signal detection outcome. Invariant: the key set equals the
/// configured signal names exactly, regardless of which detector produced it.
pub type SignalMap = BTreeMap<String, bool>;

/// Discrete opportunity bucket derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Hot,
    Warm,
    Cool,
    Cold,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Hot => "hot",
            Tier::Warm => "warm",
            Tier::Cool => "cool",
            Tier::Cold => "cold",
        };
        f.write_str(s)
    }
}

/// Which detector produced the signal map for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    Llm,
    Keywords,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionMethod::Llm => f.write_str("llm"),
            DetectionMethod::Keywords => f.write_str("keywords"),
        }
    }
}

/// Aggregated outcome of scoring a signal map. Score is unclamped and may
/// be negative.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub tier: Tier,
}
