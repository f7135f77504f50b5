//! Option contract definitions
//!
//! Listed US equity options: 100-share contracts identified by underlying,
//! strike, expiry and type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{ensure_positive, DeskError, DeskResult};

/// Standard US equity option contract size
pub const EQUITY_CONTRACT_MULTIPLIER: f64 = 100.0;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// OCC type code
    pub fn code(&self) -> char {
        match self {
            OptionType::Call => 'C',
            OptionType::Put => 'P',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "Call",
            OptionType::Put => "Put",
        }
    }
}

/// Option contract specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Underlying symbol (e.g., "AAPL")
    pub underlying: String,
    /// Strike price
    pub strike: f64,
    /// Expiration date
    pub expiry: NaiveDate,
    /// Option type (Call/Put)
    pub option_type: OptionType,
    /// Shares per contract
    pub multiplier: f64,
}

impl OptionContract {
    /// Create a standard 100-share equity option
    pub fn new(
        underlying: impl Into<String>,
        strike: f64,
        expiry: NaiveDate,
        option_type: OptionType,
    ) -> Self {
        Self {
            underlying: underlying.into(),
            strike,
            expiry,
            option_type,
            multiplier: EQUITY_CONTRACT_MULTIPLIER,
        }
    }

    pub fn call(underlying: impl Into<String>, strike: f64, expiry: NaiveDate) -> Self {
        Self::new(underlying, strike, expiry, OptionType::Call)
    }

    pub fn put(underlying: impl Into<String>, strike: f64, expiry: NaiveDate) -> Self {
        Self::new(underlying, strike, expiry, OptionType::Put)
    }

    /// Whole days until expiry. Negative once the contract has expired.
    pub fn days_to_expiry(&self, from: NaiveDate) -> i64 {
        (self.expiry - from).num_days()
    }

    /// Time to expiry in years (365-day year), floored at zero
    pub fn time_to_expiry(&self, from: NaiveDate) -> f64 {
        self.days_to_expiry(from).max(0) as f64 / 365.0
    }

    /// Intrinsic value at the given underlying price
    pub fn intrinsic(&self, spot: f64) -> f64 {
        self.option_type.intrinsic(spot, self.strike)
    }

    /// Is this option in the money?
    pub fn is_itm(&self, spot: f64) -> bool {
        match self.option_type {
            OptionType::Call => spot > self.strike,
            OptionType::Put => spot < self.strike,
        }
    }

    /// OCC option symbol: root, YYMMDD, C/P, strike x1000 padded to 8 digits.
    ///
    /// e.g. `AAPL251121C00180000` for the AAPL Nov 21 2025 180 call.
    pub fn occ_symbol(&self) -> DeskResult<String> {
        ensure_positive("strike", self.strike)?;
        let strike_thousandths = (self.strike * 1000.0).round() as u64;
        if strike_thousandths >= 100_000_000 {
            return Err(DeskError::invalid_input(format!(
                "strike {} does not fit an OCC symbol",
                self.strike
            )));
        }
        Ok(format!(
            "{}{}{}{:08}",
            self.underlying,
            self.expiry.format("%y%m%d"),
            self.option_type.code(),
            strike_thousandths
        ))
    }
}
