pub mod config;
pub mod error;
pub mod rules;
pub mod types;

pub use config::Config;
pub use error::LeadScoutError;
pub use rules::{MatchMode, RuleSet, ScoringConfig, SignalDefinition, SignalType, TierThresholds};
pub use types::*;
