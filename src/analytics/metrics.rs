//! Per-contract metrics
//!
//! Closed-form figures for one contract against an underlying price.
//! Percentages are in percent units (-0.71 means -0.71%).

use chrono::NaiveDate;

use crate::core::{ensure_positive, DeskResult, OptionContract, OptionQuote, OptionType};

/// Whole days from `as_of` to expiry. Not clamped: expired contracts go negative.
pub fn days_to_expiration(contract: &OptionContract, as_of: NaiveDate) -> i64 {
    contract.days_to_expiry(as_of)
}

/// Signed distance from the strike in percent
///
/// Call: `(S / K - 1) * 100`. Put: `(K / S - 1) * 100`. Positive means in
/// the money for either side.
pub fn moneyness(contract: &OptionContract, underlying_price: f64) -> DeskResult<f64> {
    ensure_positive("underlying price", underlying_price)?;
    ensure_positive("strike", contract.strike)?;

    let ratio = match contract.option_type {
        OptionType::Call => underlying_price / contract.strike,
        OptionType::Put => contract.strike / underlying_price,
    };
    Ok((ratio - 1.0) * 100.0)
}

/// Underlying price at expiry where a long position breaks even
pub fn break_even_price(quote: &OptionQuote) -> f64 {
    match quote.option_type() {
        OptionType::Call => quote.strike() + quote.premium,
        OptionType::Put => quote.strike() - quote.premium,
    }
}

/// Move in the underlying needed to reach break-even, in percent
pub fn price_to_break_even_pct(quote: &OptionQuote, underlying_price: f64) -> DeskResult<f64> {
    ensure_positive("underlying price", underlying_price)?;
    Ok((break_even_price(quote) / underlying_price - 1.0) * 100.0)
}

/// Exercise value per share, never negative
pub fn intrinsic_value(contract: &OptionContract, underlying_price: f64) -> f64 {
    contract.intrinsic(underlying_price)
}

/// Premium above intrinsic value
///
/// Negative only when the quote is priced below intrinsic, which is surfaced
/// as-is so bad data stays visible.
pub fn time_value(quote: &OptionQuote, underlying_price: f64) -> f64 {
    quote.premium - intrinsic_value(&quote.contract, underlying_price)
}
