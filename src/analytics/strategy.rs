//! IV-based strategy hints
//!
//! Classifies a 30/60/90-day IV term structure into sell-premium,
//! buy-options or neutral. First matching rule wins:
//! 1. all three IVs zero: insufficient data
//! 2. strictly declining: sell premium
//! 3. strictly rising: buy options
//! 4. max IV above the elevated threshold: sell premium
//! 5. max IV below the low threshold: buy options
//! 6. otherwise neutral

use serde::{Deserialize, Serialize};

use super::config::IvStrategyConfig;

/// Strategy recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IvStrategy {
    SellPremium,
    BuyOptions,
    Neutral,
    Insufficient,
}

impl IvStrategy {
    /// Short label for tables
    pub fn label(&self) -> &'static str {
        match self {
            IvStrategy::SellPremium => "Sell",
            IvStrategy::BuyOptions => "Buy",
            IvStrategy::Neutral => "Neutral",
            IvStrategy::Insufficient => "Insufficient data",
        }
    }
}

/// Recommendation plus a human-readable reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInsight {
    pub strategy: IvStrategy,
    pub rationale: String,
}

impl StrategyInsight {
    fn new(strategy: IvStrategy, rationale: impl Into<String>) -> Self {
        Self {
            strategy,
            rationale: rationale.into(),
        }
    }
}

/// Classify a 30/60/90-day term structure
pub fn classify_iv_strategy(
    iv30: f64,
    iv60: f64,
    iv90: f64,
    config: &IvStrategyConfig,
) -> StrategyInsight {
    if iv30 == 0.0 && iv60 == 0.0 && iv90 == 0.0 {
        return StrategyInsight::new(
            IvStrategy::Insufficient,
            "Not enough IV data for a term-structure reading.",
        );
    }

    let curve = format!("{:.1}% -> {:.1}% -> {:.1}%", iv30, iv60, iv90);
    let max_iv = iv30.max(iv60).max(iv90);

    if iv30 > iv60 && iv60 > iv90 {
        StrategyInsight::new(
            IvStrategy::SellPremium,
            format!(
                "Declining term structure ({}). Short-dated premium is rich; \
                 consider selling puts or covered calls.",
                curve
            ),
        )
    } else if iv30 < iv60 && iv60 < iv90 {
        StrategyInsight::new(
            IvStrategy::BuyOptions,
            format!(
                "Rising term structure ({}). Longer-dated options carry more \
                 volatility; consider calendar spreads or longer-dated positions.",
                curve
            ),
        )
    } else if max_iv > config.elevated_threshold() {
        StrategyInsight::new(
            IvStrategy::SellPremium,
            format!(
                "Elevated IV ({:.1}% above {:.1}%). Credit spreads or iron \
                 condors can capture IV contraction.",
                max_iv,
                config.elevated_threshold()
            ),
        )
    } else if max_iv < config.low_threshold() {
        StrategyInsight::new(
            IvStrategy::BuyOptions,
            format!(
                "Low IV ({:.1}% below {:.1}%). Premiums are cheap; consider \
                 long options or debit spreads.",
                max_iv,
                config.low_threshold()
            ),
        )
    } else {
        StrategyInsight::new(
            IvStrategy::Neutral,
            format!(
                "Moderate IV across horizons ({}). Pick vertical spreads or \
                 iron condors by directional bias.",
                curve
            ),
        )
    }
}

/// Hint for a single horizon's IV
///
/// Uses the horizon's configured thresholds when present, otherwise the
/// overall elevated/low thresholds.
pub fn horizon_insight(days: i64, iv: f64, config: &IvStrategyConfig) -> StrategyInsight {
    if iv <= 0.0 {
        return StrategyInsight::new(
            IvStrategy::Insufficient,
            format!("No IV data near {} days.", days),
        );
    }

    let (high, low) = match config.horizon(days) {
        Some(h) => (h.high, h.low),
        None => (config.elevated_threshold(), config.low_threshold()),
    };
    let long_dated = days >= 90;

    if iv > high {
        let what = if long_dated {
            "LEAPS premium selling is worth a look"
        } else {
            "favorable window for selling puts"
        };
        StrategyInsight::new(
            IvStrategy::SellPremium,
            format!("High {}-day IV ({:.1}%): {}.", days, iv, what),
        )
    } else if iv > low {
        let what = if long_dated {
            "balanced long-term positioning"
        } else {
            "calendar spreads can use the term structure"
        };
        StrategyInsight::new(
            IvStrategy::Neutral,
            format!("Moderate {}-day IV ({:.1}%): {}.", days, iv, what),
        )
    } else {
        let what = if long_dated {
            "good environment for buying LEAPS"
        } else {
            "directional strategies may be preferred"
        };
        StrategyInsight::new(
            IvStrategy::BuyOptions,
            format!("Low {}-day IV ({:.1}%): {}.", days, iv, what),
        )
    }
}
