//! Thresholds for IV-based strategy hints
//!
//! Heuristic cut-offs, not derived from any model. Tune per desk.

use serde::{Deserialize, Serialize};

/// Configuration for term-structure classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvStrategyConfig {
    /// Baseline IV in percent that "elevated" and "low" are measured against
    /// Default: 25.0
    pub historical_avg_iv: f64,

    /// Max IV above `historical_avg_iv * elevated_multiplier` favors selling
    /// Default: 1.6 (40% with the default baseline)
    pub elevated_multiplier: f64,

    /// Max IV below `historical_avg_iv * low_multiplier` favors buying
    /// Default: 0.8 (20% with the default baseline)
    pub low_multiplier: f64,

    /// Single-horizon thresholds used by `horizon_insight`
    pub horizons: Vec<HorizonThresholds>,
}

/// Sell above `high`, buy at or below `low`, neutral between
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonThresholds {
    pub days: i64,
    pub high: f64,
    pub low: f64,
}

impl Default for IvStrategyConfig {
    fn default() -> Self {
        Self {
            historical_avg_iv: 25.0,
            elevated_multiplier: 1.6,
            low_multiplier: 0.8,
            horizons: vec![
                HorizonThresholds {
                    days: 60,
                    high: 35.0,
                    low: 20.0,
                },
                HorizonThresholds {
                    days: 90,
                    high: 30.0,
                    low: 20.0,
                },
            ],
        }
    }
}

impl IvStrategyConfig {
    /// Wider neutral band: fewer sell/buy calls
    pub fn conservative() -> Self {
        Self {
            elevated_multiplier: 1.8,
            low_multiplier: 0.7,
            ..Default::default()
        }
    }

    /// Narrower neutral band: more sell/buy calls
    pub fn aggressive() -> Self {
        Self {
            elevated_multiplier: 1.4,
            low_multiplier: 0.9,
            ..Default::default()
        }
    }

    /// IV above this is elevated
    pub fn elevated_threshold(&self) -> f64 {
        self.historical_avg_iv * self.elevated_multiplier
    }

    /// IV below this is low
    pub fn low_threshold(&self) -> f64 {
        self.historical_avg_iv * self.low_multiplier
    }

    /// Thresholds for a specific horizon, if configured
    pub fn horizon(&self, days: i64) -> Option<&HorizonThresholds> {
        self.horizons.iter().find(|h| h.days == days)
    }
}
