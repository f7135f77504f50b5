//! Profit/loss at expiry for hypothetical underlying prices

use serde::{Deserialize, Serialize};

use super::metrics::intrinsic_value;
use crate::core::{ensure_positive, DeskError, DeskResult, OptionQuote};

/// Down 10%, unchanged, up 10%
pub const DEFAULT_PRICE_MULTIPLIERS: [f64; 3] = [0.9, 1.0, 1.1];

/// Outcome of holding one long contract to expiry at a given price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitScenario {
    /// Underlying price at expiry
    pub hypothetical_price: f64,
    /// Change from the current price, in percent
    pub pct_change: f64,
    /// (intrinsic - premium) x contract multiplier
    pub profit_per_contract: f64,
}

impl ProfitScenario {
    pub fn is_profitable(&self) -> bool {
        self.profit_per_contract > 0.0
    }
}

/// One scenario per multiplier, in the order given
pub fn profit_scenarios(
    quote: &OptionQuote,
    underlying_price: f64,
    price_multipliers: &[f64],
) -> DeskResult<Vec<ProfitScenario>> {
    ensure_positive("underlying price", underlying_price)?;

    price_multipliers
        .iter()
        .map(|&m| {
            if !m.is_finite() || m < 0.0 {
                return Err(DeskError::invalid_input(format!(
                    "price multiplier must be non-negative, got {}",
                    m
                )));
            }
            let hypothetical_price = underlying_price * m;
            let intrinsic = intrinsic_value(&quote.contract, hypothetical_price);
            Ok(ProfitScenario {
                hypothetical_price,
                pct_change: (m - 1.0) * 100.0,
                profit_per_contract: (intrinsic - quote.premium) * quote.contract.multiplier,
            })
        })
        .collect()
}

/// Loss on a long contract if it expires worthless
pub fn max_loss(quote: &OptionQuote) -> f64 {
    quote.contract_cost()
}
