//! Analytics-ready projection of a selected contract
//!
//! Derived and read-only: rebuild it whenever the selected contract or the
//! underlying quote changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::metrics::{
    break_even_price, days_to_expiration, intrinsic_value, moneyness, price_to_break_even_pct,
    time_value,
};
use super::scenarios::{max_loss, profit_scenarios, ProfitScenario};
use crate::core::{ensure_positive, DeskError, DeskResult, OptionQuote, StockQuote};

/// A selected option with its derived metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedOptionView {
    /// The contract, its moneyness flag re-marked at `underlying_price`
    pub quote: OptionQuote,
    /// Underlying price the metrics are computed at
    pub underlying_price: f64,
    /// Underlying day change in percent, when a stock quote was supplied
    pub underlying_change_pct: Option<f64>,
    /// Calendar days to expiry, negative once expired
    pub days_to_expiration: i64,
    /// S/K - 1 for calls, K/S - 1 for puts, in percent
    pub moneyness: f64,
    /// Underlying price at expiry where a long position breaks even
    pub break_even_price: f64,
    /// Move needed to reach break-even, in percent of the current price
    pub price_to_break_even_pct: f64,
    /// Exercise value per share
    pub intrinsic_value: f64,
    /// Premium minus intrinsic; negative marks an anomalous quote
    pub time_value: f64,
    /// Same as `quote.in_the_money`
    pub in_the_money: bool,
    /// Premium x multiplier
    pub cost_per_contract: f64,
    /// Loss if a long contract expires worthless
    pub max_loss: f64,
}

impl SelectedOptionView {
    /// Build against a stock quote for the same underlying
    pub fn new(quote: &OptionQuote, stock: &StockQuote, as_of: NaiveDate) -> DeskResult<Self> {
        if !stock.symbol.eq_ignore_ascii_case(&quote.contract.underlying) {
            return Err(DeskError::invalid_input(format!(
                "contract on {} does not match quote for {}",
                quote.contract.underlying, stock.symbol
            )));
        }
        let mut view = Self::at_price(quote, stock.current_price, as_of)?;
        if stock.previous_close > 0.0 {
            view.underlying_change_pct = Some(stock.price_change_pct());
        }
        Ok(view)
    }

    /// Build against a bare underlying price
    pub fn at_price(quote: &OptionQuote, underlying_price: f64, as_of: NaiveDate) -> DeskResult<Self> {
        ensure_positive("underlying price", underlying_price)?;
        let mut marked = quote.clone();
        marked.mark_moneyness(underlying_price);

        Ok(Self {
            quote: marked,
            underlying_price,
            underlying_change_pct: None,
            days_to_expiration: days_to_expiration(&quote.contract, as_of),
            moneyness: moneyness(&quote.contract, underlying_price)?,
            break_even_price: break_even_price(quote),
            price_to_break_even_pct: price_to_break_even_pct(quote, underlying_price)?,
            intrinsic_value: intrinsic_value(&quote.contract, underlying_price),
            time_value: time_value(quote, underlying_price),
            in_the_money: quote.contract.is_itm(underlying_price),
            cost_per_contract: quote.contract_cost(),
            max_loss: max_loss(quote),
        })
    }

    /// Premium outlay for `quantity` contracts
    pub fn total_cost(&self, quantity: u32) -> f64 {
        self.cost_per_contract * quantity as f64
    }

    /// Expiry P&L at multiples of the current underlying price
    pub fn scenarios(&self, price_multipliers: &[f64]) -> DeskResult<Vec<ProfitScenario>> {
        profit_scenarios(&self.quote, self.underlying_price, price_multipliers)
    }

    /// Premium sits below intrinsic value
    pub fn is_anomalous(&self) -> bool {
        self.time_value < 0.0
    }
}
