use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::LeadScoutError;
use crate::types::SignalMap;

/// A named, immutable ruleset: signal definitions plus scoring weights.
/// Loaded once at startup; reload requires a restart.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSet {
    pub name: String,
    pub signals: BTreeMap<String, SignalDefinition>,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalDefinition {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    #[serde(rename = "match", default)]
    pub match_mode: MatchMode,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub competitors: Vec<String>,
    #[serde(default)]
    pub deployment_terms: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Keywords of this signal are brand names or jargon that must not be
    /// localized when building multi-language keyword lists.
    #[serde(default)]
    pub no_translate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Trigger,
    Context,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Any,
    All,
    CompetitorDeployment,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub trigger_weight: f64,
    pub context_weight: f64,
    pub negative_weight: f64,
    pub tiers: TierThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            trigger_weight: 30.0,
            context_weight: 10.0,
            negative_weight: -20.0,
            tiers: TierThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub hot: f64,
    pub warm: f64,
    pub cool: f64,
    pub cold: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            hot: 50.0,
            warm: 30.0,
            cool: 10.0,
            cold: 0.0,
        }
    }
}

impl RuleSet {
    /// Load and validate a ruleset from a TOML file.
    pub fn load(path: &Path) -> Result<Self, LeadScoutError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LeadScoutError::Config(format!(
                "Rules file not readable: {}: {e}. Copy signals.example.toml to signals.toml and customize.",
                path.display()
            ))
        })?;
        Self::from_toml(&content)
            .map_err(|e| LeadScoutError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse and validate a ruleset from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, LeadScoutError> {
        let rules: RuleSet = toml::from_str(content)
            .map_err(|e| LeadScoutError::Config(format!("Invalid rules TOML: {e}")))?;
        rules.validate()?;
        Ok(rules)
    }

    fn validate(&self) -> Result<(), LeadScoutError> {
        let t = &self.scoring.tiers;
        if !(t.hot >= t.warm && t.warm >= t.cool && t.cool >= t.cold) {
            return Err(LeadScoutError::Config(format!(
                "Tier thresholds must be non-increasing (hot >= warm >= cool >= cold), got hot={} warm={} cool={} cold={}",
                t.hot, t.warm, t.cool, t.cold
            )));
        }
        Ok(())
    }

    pub fn signal_names(&self) -> impl Iterator<Item = &str> {
        self.signals.keys().map(String::as_str)
    }

    /// All configured signals marked false — the result shape for queries
    /// that retrieve nothing, and the normalization baseline for both
    /// detectors.
    pub fn empty_signals(&self) -> SignalMap {
        self.signals.keys().map(|name| (name.clone(), false)).collect()
    }

    pub fn signals_by_type(&self, signal_type: SignalType) -> Vec<(&str, &SignalDefinition)> {
        self.signals
            .iter()
            .filter(|(_, def)| def.signal_type == signal_type)
            .map(|(name, def)| (name.as_str(), def))
            .collect()
    }

    /// Keywords and deployment terms of signals eligible for translation
    /// (everything not flagged `no_translate`), deduplicated.
    pub fn translatable_keywords(&self) -> Vec<String> {
        let mut keywords = BTreeSet::new();
        for def in self.signals.values() {
            if def.no_translate {
                continue;
            }
            keywords.extend(def.keywords.iter().cloned());
            keywords.extend(def.deployment_terms.iter().cloned());
        }
        keywords.into_iter().collect()
    }
}
