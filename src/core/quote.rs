//! Market quotes
//!
//! Option quotes (a contract plus premium, book, activity, IV and Greeks) and
//! stock quotes with a daily price history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::greeks::Greeks;
use super::option::{OptionContract, OptionType};

/// Option market quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// The option contract
    pub contract: OptionContract,
    /// Premium per share
    pub premium: f64,
    /// Bid price
    pub bid: f64,
    /// Ask price
    pub ask: f64,
    /// Contracts traded
    pub volume: u64,
    /// Open interest
    pub open_interest: u64,
    /// Implied volatility in percentage units (27.5 means 27.5%)
    pub implied_volatility: f64,
    /// Greeks
    pub greeks: Greeks,
    /// Moneyness flag relative to the underlying price at quote time
    pub in_the_money: bool,
}

impl OptionQuote {
    /// Quote with a premium and no book, activity or Greeks yet
    pub fn new(contract: OptionContract, premium: f64) -> Self {
        Self {
            contract,
            premium,
            bid: premium,
            ask: premium,
            volume: 0,
            open_interest: 0,
            implied_volatility: 0.0,
            greeks: Greeks::default(),
            in_the_money: false,
        }
    }

    pub fn strike(&self) -> f64 {
        self.contract.strike
    }

    pub fn expiry(&self) -> NaiveDate {
        self.contract.expiry
    }

    pub fn option_type(&self) -> OptionType {
        self.contract.option_type
    }

    /// Bid-ask spread
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// Mid price
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Premium for one full contract
    pub fn contract_cost(&self) -> f64 {
        self.premium * self.contract.multiplier
    }

    /// Recompute the moneyness flag against an underlying price
    pub fn mark_moneyness(&mut self, underlying_price: f64) {
        self.in_the_money = self.contract.is_itm(underlying_price);
    }

    /// Basic sanity of the quoted fields
    pub fn is_consistent(&self) -> bool {
        self.premium >= 0.0
            && self.bid >= 0.0
            && self.ask >= self.bid
            && self.implied_volatility > 0.0
            && self.greeks.is_well_formed()
    }
}

/// One daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// low <= open, close <= high
    pub fn is_well_formed(&self) -> bool {
        self.low <= self.open
            && self.low <= self.close
            && self.open <= self.high
            && self.close <= self.high
    }
}

/// Stock quote with a chronological daily history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub history: Vec<PriceBar>,
}

impl StockQuote {
    /// Build from a chronological history. The last close is the current
    /// price; with fewer than two bars the previous close is estimated at 99%.
    pub fn from_history(symbol: impl Into<String>, history: Vec<PriceBar>) -> Option<Self> {
        let current_price = history.last()?.close;
        let previous_close = if history.len() >= 2 {
            history[history.len() - 2].close
        } else {
            current_price * 0.99
        };

        Some(Self {
            symbol: symbol.into(),
            current_price,
            previous_close,
            history,
        })
    }

    /// Day change in percent
    pub fn price_change_pct(&self) -> f64 {
        (self.current_price / self.previous_close - 1.0) * 100.0
    }

    /// Are the history dates strictly increasing?
    pub fn is_chronological(&self) -> bool {
        self.history.windows(2).all(|w| w[0].date < w[1].date)
    }
}
