use leadscout_common::{RuleSet, ScoreResult, SignalMap, SignalType, Tier, TierThresholds};

/// Sum the configured weight of each detected signal's type. No clamping:
/// negative weights can pull the total below zero.
pub fn score_signals(signals: &SignalMap, rules: &RuleSet) -> ScoreResult {
    let scoring = &rules.scoring;
    let mut score = 0.0;

    for (name, detected) in signals {
        if !detected {
            continue;
        }
        // A name with no configured definition contributes nothing.
        let Some(def) = rules.signals.get(name) else {
            continue;
        };
        score += match def.signal_type {
            SignalType::Trigger => scoring.trigger_weight,
            SignalType::Context => scoring.context_weight,
            SignalType::Negative => scoring.negative_weight,
        };
    }

    ScoreResult {
        score,
        tier: tier_for(score, &scoring.tiers),
    }
}

/// The highest threshold the score meets, checked hot through cool;
/// anything below cool is cold.
pub fn tier_for(score: f64, tiers: &TierThresholds) -> Tier {
    if score >= tiers.hot {
        Tier::Hot
    } else if score >= tiers.warm {
        Tier::Warm
    } else if score >= tiers.cool {
        Tier::Cool
    } else {
        Tier::Cold
    }
}
