//! Configuration for synthetic market data

use serde::{Deserialize, Serialize};

use crate::core::{DeskError, DeskResult};

/// Parameters of the synthetic quote and chain generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Lowest base price a symbol can map to
    /// Default: 50.0
    pub price_floor: f64,

    /// Symbol hash is reduced modulo this to offset the floor
    /// Base prices land in [floor, floor + range)
    /// Default: 200
    pub price_range: u32,

    /// Daily bars of history ending on the as-of date
    /// Default: 30
    pub history_days: usize,

    /// Half-width of the uniform noise band on open/close
    /// Default: 2.0
    pub price_noise: f64,

    /// Monthly expirations listed on the chain
    /// Default: 4
    pub expiration_count: usize,

    /// Leading expirations that receive contracts, the rest stay empty
    /// Default: 2
    pub populated_expirations: usize,

    /// Strikes on each side of the base price
    /// Default: 4 (9 strikes)
    pub strikes_per_side: usize,

    /// Strike increment
    /// Default: 5.0
    pub strike_step: f64,

    /// Base IV is drawn uniformly from [min, max), in percent
    /// Default: 25.0 .. 35.0
    pub base_iv_min: f64,
    pub base_iv_max: f64,

    /// IV grows by `slope * years` relative to base IV
    /// Default: 0.2
    pub iv_term_slope: f64,

    /// Upper bound of the positive noise added to the theoretical value
    /// Default: 0.25
    pub premium_noise: f64,

    /// Premium floor
    /// Default: 0.05
    pub min_premium: f64,

    /// Distance from premium to bid and to ask
    /// Default: 0.05
    pub half_spread: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            price_floor: 50.0,
            price_range: 200,
            history_days: 30,
            price_noise: 2.0,
            expiration_count: 4,
            populated_expirations: 2,
            strikes_per_side: 4,
            strike_step: 5.0,
            base_iv_min: 25.0,
            base_iv_max: 35.0,
            iv_term_slope: 0.2,
            premium_noise: 0.25,
            min_premium: 0.05,
            half_spread: 0.05,
        }
    }
}

impl SynthesisConfig {
    /// Every expiration populated, wider strike ladder
    pub fn deep_chain() -> Self {
        Self {
            populated_expirations: 4,
            strikes_per_side: 6,
            ..Default::default()
        }
    }

    /// Upper bound (exclusive) of generated prices
    pub fn price_ceiling(&self) -> f64 {
        self.price_floor + self.price_range as f64
    }

    pub fn validate(&self) -> DeskResult<()> {
        if !(self.price_floor > 0.0) {
            return Err(DeskError::config("price_floor must be positive"));
        }
        if self.price_range == 0 {
            return Err(DeskError::config("price_range must be at least 1"));
        }
        if self.history_days == 0 {
            return Err(DeskError::config("history_days must be at least 1"));
        }
        if !(self.strike_step > 0.0) {
            return Err(DeskError::config("strike_step must be positive"));
        }
        if !(self.base_iv_min > 0.0) || self.base_iv_max < self.base_iv_min {
            return Err(DeskError::config(format!(
                "invalid base IV range [{}, {})",
                self.base_iv_min, self.base_iv_max
            )));
        }
        if self.price_noise < 0.0
            || self.premium_noise < 0.0
            || self.min_premium < 0.0
            || self.half_spread < 0.0
        {
            return Err(DeskError::config("noise, spread and premium floor must be non-negative"));
        }
        Ok(())
    }
}
