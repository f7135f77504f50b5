//! Options chain across expirations
//!
//! Calls and puts for one underlying. Expirations keep generation order and
//! may have no contracts listed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::option::OptionType;
use super::quote::OptionQuote;

/// Full options chain for one underlying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsChain {
    /// Underlying symbol
    pub symbol: String,
    /// Underlying price the chain was built against
    pub current_price: f64,
    /// Expirations in generation order, deduplicated
    pub expirations: Vec<NaiveDate>,
    /// Call quotes
    pub calls: Vec<OptionQuote>,
    /// Put quotes
    pub puts: Vec<OptionQuote>,
}

impl OptionsChain {
    pub fn new(symbol: impl Into<String>, current_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            current_price,
            expirations: Vec::new(),
            calls: Vec::new(),
            puts: Vec::new(),
        }
    }

    /// Register an expiration. Returns false if it was already present.
    pub fn add_expiration(&mut self, expiry: NaiveDate) -> bool {
        if self.expirations.contains(&expiry) {
            return false;
        }
        self.expirations.push(expiry);
        true
    }

    /// Add a quote to the calls or puts side, registering its expiry
    pub fn add_quote(&mut self, quote: OptionQuote) {
        self.add_expiration(quote.expiry());
        match quote.option_type() {
            OptionType::Call => self.calls.push(quote),
            OptionType::Put => self.puts.push(quote),
        }
    }

    /// Total number of listed contracts
    pub fn total_contracts(&self) -> usize {
        self.calls.len() + self.puts.len()
    }

    /// All quotes, calls first
    pub fn quotes(&self) -> impl Iterator<Item = &OptionQuote> {
        self.calls.iter().chain(self.puts.iter())
    }

    /// Calls and puts listed for one expiration
    pub fn quotes_for_expiry(&self, expiry: NaiveDate) -> impl Iterator<Item = &OptionQuote> {
        self.quotes().filter(move |q| q.expiry() == expiry)
    }

    /// Expirations that have at least one contract
    pub fn populated_expirations(&self) -> Vec<NaiveDate> {
        self.expirations
            .iter()
            .copied()
            .filter(|&e| self.quotes_for_expiry(e).next().is_some())
            .collect()
    }

    /// Sorted, deduplicated strikes for one expiration
    pub fn strikes_for_expiry(&self, expiry: NaiveDate) -> Vec<f64> {
        let mut strikes: Vec<f64> = self.quotes_for_expiry(expiry).map(|q| q.strike()).collect();
        strikes.sort_by(|a, b| a.total_cmp(b));
        strikes.dedup();
        strikes
    }

    /// Strike closest to the underlying price at an expiration
    pub fn atm_strike(&self, expiry: NaiveDate) -> Option<f64> {
        self.strikes_for_expiry(expiry).into_iter().min_by(|a, b| {
            let da = (self.current_price - a).abs();
            let db = (self.current_price - b).abs();
            da.total_cmp(&db)
        })
    }

    /// Get call quote at expiry and strike
    pub fn call_at(&self, expiry: NaiveDate, strike: f64) -> Option<&OptionQuote> {
        self.calls
            .iter()
            .find(|q| q.expiry() == expiry && (q.strike() - strike).abs() < 0.01)
    }

    /// Get put quote at expiry and strike
    pub fn put_at(&self, expiry: NaiveDate, strike: f64) -> Option<&OptionQuote> {
        self.puts
            .iter()
            .find(|q| q.expiry() == expiry && (q.strike() - strike).abs() < 0.01)
    }

    /// Quote by side, expiry and strike
    pub fn quote_at(
        &self,
        option_type: OptionType,
        expiry: NaiveDate,
        strike: f64,
    ) -> Option<&OptionQuote> {
        match option_type {
            OptionType::Call => self.call_at(expiry, strike),
            OptionType::Put => self.put_at(expiry, strike),
        }
    }

    /// Every call has a put at the same (expiry, strike) and vice versa
    pub fn is_paired(&self) -> bool {
        self.calls.len() == self.puts.len()
            && self
                .calls
                .iter()
                .all(|c| self.put_at(c.expiry(), c.strike()).is_some())
            && self
                .puts
                .iter()
                .all(|p| self.call_at(p.expiry(), p.strike()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionContract;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn pair(chain: &mut OptionsChain, expiry: NaiveDate, strike: f64) {
        chain.add_quote(OptionQuote::new(OptionContract::call("AAPL", strike, expiry), 2.0));
        chain.add_quote(OptionQuote::new(OptionContract::put("AAPL", strike, expiry), 2.0));
    }

    #[test]
    fn test_expirations_dedup_and_order() {
        let mut chain = OptionsChain::new("AAPL", 178.72);
        assert!(chain.add_expiration(date(4, 17)));
        assert!(chain.add_expiration(date(3, 21)));
        assert!(!chain.add_expiration(date(4, 17)));
        assert_eq!(chain.expirations, vec![date(4, 17), date(3, 21)]);
    }

    #[test]
    fn test_lookup_and_pairing() {
        let mut chain = OptionsChain::new("AAPL", 178.72);
        chain.add_expiration(date(3, 21));
        chain.add_expiration(date(4, 17));
        for strike in [175.0, 180.0, 185.0] {
            pair(&mut chain, date(3, 21), strike);
        }

        assert_eq!(chain.total_contracts(), 6);
        assert!(chain.is_paired());
        assert_eq!(chain.populated_expirations(), vec![date(3, 21)]);
        assert_eq!(chain.quotes_for_expiry(date(4, 17)).count(), 0);
        assert_eq!(chain.atm_strike(date(3, 21)), Some(180.0));
        assert!(chain.quote_at(OptionType::Put, date(3, 21), 185.0).is_some());
        assert!(chain.call_at(date(4, 17), 185.0).is_none());

        // A lone call breaks pairing
        chain.add_quote(OptionQuote::new(
            OptionContract::call("AAPL", 190.0, date(3, 21)),
            1.0,
        ));
        assert!(!chain.is_paired());
    }
}
