//! Synthetic quote and options chain generator
//!
//! Produces a self-consistent stock quote and options chain for any symbol
//! without external I/O. The base price is a pure function of the symbol;
//! day-to-day noise, IV and Greeks come from the caller's generator, so a
//! seeded generator reproduces the output exactly.
//!
//! The pricing here is demo-grade. Premiums are intrinsic value plus an
//! IV-scaled time value, delta is a logistic curve in moneyness, and gamma,
//! theta and vega are bounded random draws. None of it comes from a pricing
//! model and the magnitudes are not financially meaningful.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use tracing::debug;

use super::calendar::monthly_expirations;
use super::config::SynthesisConfig;
use crate::core::{
    ensure_positive, DeskError, DeskResult, Greeks, OptionContract, OptionQuote, OptionType,
    OptionsChain, PriceBar, StockQuote,
};

/// Deterministic-by-seed market data generator
#[derive(Debug, Clone, Default)]
pub struct MarketDataSynthesizer {
    config: SynthesisConfig,
}

impl MarketDataSynthesizer {
    /// Create a synthesizer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: SynthesisConfig) -> DeskResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get current configuration
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Base price derived from the sum of the symbol's character codes
    ///
    /// `floor + (hash mod range)`, so [50, 250) with defaults. Case is not
    /// normalized: "aapl" and "AAPL" map to different prices.
    pub fn base_price(&self, symbol: &str) -> DeskResult<f64> {
        validate_symbol(symbol)?;
        let hash: u64 = symbol.chars().map(|c| c as u64).sum();
        let offset = hash % self.config.price_range as u64;
        Ok(self.config.price_floor + offset as f64)
    }

    /// Synthesize a stock quote with a daily history ending on `as_of`
    pub fn synthesize_quote<R: Rng + ?Sized>(
        &self,
        symbol: &str,
        as_of: NaiveDate,
        rng: &mut R,
    ) -> DeskResult<StockQuote> {
        let base = self.base_price(symbol)?;
        let cfg = &self.config;
        let days = cfg.history_days.max(1);

        let history: Vec<PriceBar> = (0..days)
            .map(|i| {
                let date = as_of - Duration::days((days - 1 - i) as i64);
                self.synthesize_bar(base, date, rng)
            })
            .collect();

        let quote = StockQuote::from_history(symbol, history)
            .ok_or_else(|| DeskError::data(format!("empty history for {}", symbol)))?;

        debug!(
            "Synthesized quote for {}: base {:.2}, last {:.2}, {} bars",
            symbol,
            base,
            quote.current_price,
            quote.history.len()
        );
        Ok(quote)
    }

    fn synthesize_bar<R: Rng + ?Sized>(&self, base: f64, date: NaiveDate, rng: &mut R) -> PriceBar {
        let cfg = &self.config;
        let band = cfg.price_noise;
        // Keep every close inside [floor, ceiling)
        let clamp = |p: f64| p.clamp(cfg.price_floor, cfg.price_ceiling() - 0.01);

        let open = clamp(round_cents(base + uniform(rng, -band, band)));
        let close = clamp(round_cents(base + uniform(rng, -band, band)));
        let high = round_cents(open.max(close) + uniform(rng, 0.0, band / 2.0));
        let low = round_cents(open.min(close) - uniform(rng, 0.0, band / 2.0)).max(0.01);
        let volume = rng.gen_range(1_000_000..5_000_000);

        PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Synthesize a call/put chain around `base_price`
    ///
    /// Lists `expiration_count` third-Friday expirations, but only the first
    /// `populated_expirations` receive contracts. Every (expiry, strike) gets
    /// one call and one put.
    pub fn synthesize_options_chain<R: Rng + ?Sized>(
        &self,
        symbol: &str,
        base_price: f64,
        as_of: NaiveDate,
        rng: &mut R,
    ) -> DeskResult<OptionsChain> {
        validate_symbol(symbol)?;
        ensure_positive("base price", base_price)?;

        let cfg = &self.config;
        let expirations = monthly_expirations(as_of, cfg.expiration_count);
        let strikes = self.strikes(base_price);

        let mut chain = OptionsChain::new(symbol, base_price);
        for &expiry in &expirations {
            chain.add_expiration(expiry);
        }

        for &expiry in expirations.iter().take(cfg.populated_expirations) {
            for &strike in &strikes {
                for option_type in [OptionType::Call, OptionType::Put] {
                    let contract = OptionContract::new(symbol, strike, expiry, option_type);
                    chain.add_quote(self.synthesize_contract(contract, base_price, as_of, rng));
                }
            }
        }

        debug!(
            "Synthesized chain for {}: {} expirations, {} strikes, {} contracts",
            symbol,
            chain.expirations.len(),
            strikes.len(),
            chain.total_contracts()
        );
        Ok(chain)
    }

    /// Strike ladder `round(base + i * step)` for i in [-n, n], positive only
    pub fn strikes(&self, base_price: f64) -> Vec<f64> {
        let n = self.config.strikes_per_side as i64;
        let mut strikes: Vec<f64> = (-n..=n)
            .map(|i| (base_price + i as f64 * self.config.strike_step).round())
            .filter(|&k| k > 0.0)
            .collect();
        strikes.dedup();
        strikes
    }

    fn synthesize_contract<R: Rng + ?Sized>(
        &self,
        contract: OptionContract,
        spot: f64,
        as_of: NaiveDate,
        rng: &mut R,
    ) -> OptionQuote {
        let cfg = &self.config;
        let time = contract.time_to_expiry(as_of);

        // Later expirations carry more IV
        let base_iv = uniform(rng, cfg.base_iv_min, cfg.base_iv_max);
        let implied_volatility = base_iv * (1.0 + time * cfg.iv_term_slope);

        let intrinsic = contract.intrinsic(spot);
        let time_value = implied_volatility / 100.0 * spot * time.sqrt();
        let noise = uniform(rng, 0.0, cfg.premium_noise);
        let premium = round_cents((intrinsic + time_value + noise).max(cfg.min_premium));

        let distance = (spot - contract.strike).abs() / spot;
        let liquidity = (1.0 - distance).max(0.1);
        let volume = (uniform(rng, 500.0, 1500.0) * liquidity) as u64;
        let open_interest = (volume as f64 * uniform(rng, 2.0, 6.0)) as u64;

        let greeks = Greeks {
            delta: synthetic_delta(contract.option_type, spot, contract.strike, implied_volatility, time),
            gamma: uniform(rng, 0.01, 0.10),
            theta: uniform(rng, -0.20, -0.01),
            vega: uniform(rng, 0.05, 0.30),
        };

        let in_the_money = contract.is_itm(spot);
        OptionQuote {
            contract,
            premium,
            bid: round_cents((premium - cfg.half_spread).max(0.0)),
            ask: round_cents(premium + cfg.half_spread),
            volume,
            open_interest,
            implied_volatility,
            greeks,
            in_the_money,
        }
    }
}

/// Logistic stand-in for delta
///
/// `1 / (1 + exp(-1.7 x))` with `x = ln(S/K) / (σ √T)`, clamped to
/// [0.05, 0.95] for calls and mirrored to [-0.95, -0.05] for puts. A
/// display placeholder, not a model delta.
pub fn synthetic_delta(option_type: OptionType, spot: f64, strike: f64, iv_pct: f64, time: f64) -> f64 {
    let sigma_t = (iv_pct / 100.0 * time.sqrt()).max(1e-6);
    let x = (spot / strike).ln() / sigma_t;
    let call = 1.0 / (1.0 + (-1.7 * x).exp());

    match option_type {
        OptionType::Call => call.clamp(0.05, 0.95),
        OptionType::Put => (call - 1.0).clamp(-0.95, -0.05),
    }
}

fn validate_symbol(symbol: &str) -> DeskResult<()> {
    if symbol.trim().is_empty() {
        return Err(DeskError::invalid_symbol("symbol must not be empty"));
    }
    Ok(())
}

/// Uniform draw in [lo, hi); a zero-width range returns `lo`
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.gen::<f64>()
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    #[test]
    fn test_base_price_from_character_codes() {
        let synth = MarketDataSynthesizer::new();
        // A(65) + A(65) + P(80) + L(76) = 286 -> 50 + 86
        assert_eq!(synth.base_price("AAPL").unwrap(), 136.0);
        assert_ne!(synth.base_price("aapl").unwrap(), 136.0);
        assert!(matches!(synth.base_price(""), Err(DeskError::InvalidSymbol(_))));
        assert!(matches!(synth.base_price("   "), Err(DeskError::InvalidSymbol(_))));
    }

    #[test]
    fn test_quote_structure() {
        let synth = MarketDataSynthesizer::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let quote = synth.synthesize_quote("AAPL", as_of(), &mut rng).unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.history.len(), 30);
        assert_eq!(quote.history.last().unwrap().date, as_of());
        assert_eq!(quote.history[0].date, as_of() - Duration::days(29));
        assert!(quote.is_chronological());
        assert!(quote.history.iter().all(|b| b.is_well_formed()));
        assert!((quote.current_price - 136.0).abs() <= 2.0);
        assert_eq!(quote.current_price, quote.history[29].close);
        assert_eq!(quote.previous_close, quote.history[28].close);
    }

    #[test]
    fn test_seed_reproducibility() {
        let synth = MarketDataSynthesizer::new();
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);

        let qa = synth.synthesize_quote("MSFT", as_of(), &mut a).unwrap();
        let qb = synth.synthesize_quote("MSFT", as_of(), &mut b).unwrap();
        assert_eq!(qa, qb);

        let ca = synth.synthesize_options_chain("MSFT", 120.0, as_of(), &mut a).unwrap();
        let cb = synth.synthesize_options_chain("MSFT", 120.0, as_of(), &mut b).unwrap();
        assert_eq!(ca, cb);
    }

    #[test]
    fn test_aapl_chain_shape() {
        let synth = MarketDataSynthesizer::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let base = synth.base_price("AAPL").unwrap();
        let chain = synth.synthesize_options_chain("AAPL", base, as_of(), &mut rng).unwrap();

        assert_eq!(chain.expirations.len(), 4);
        assert_eq!(chain.populated_expirations().len(), 2);
        assert_eq!(chain.calls.len(), 18);
        assert_eq!(chain.puts.len(), 18);
        assert_eq!(chain.total_contracts(), 36);
        assert!(chain.is_paired());

        // The two trailing expirations are listed but empty
        for &expiry in &chain.expirations[2..] {
            assert_eq!(chain.quotes_for_expiry(expiry).count(), 0);
        }

        let strikes = chain.strikes_for_expiry(chain.expirations[0]);
        assert_eq!(
            strikes,
            vec![116.0, 121.0, 126.0, 131.0, 136.0, 141.0, 146.0, 151.0, 156.0]
        );
    }

    #[test]
    fn test_contract_fields() {
        let synth = MarketDataSynthesizer::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let chain = synth.synthesize_options_chain("SPY", 150.0, as_of(), &mut rng).unwrap();

        for quote in chain.quotes() {
            assert!(chain.expirations.contains(&quote.expiry()));
            assert!(quote.is_consistent());
            assert!(quote.premium >= 0.05);
            assert!((quote.ask - quote.premium - 0.05).abs() < 1e-9);
            assert!(quote.premium - quote.contract.intrinsic(150.0) >= 0.0);

            let days = quote.contract.days_to_expiry(as_of());
            let max_iv = 35.0 * (1.0 + days as f64 / 365.0 * 0.2);
            assert!(quote.implied_volatility >= 25.0 && quote.implied_volatility < max_iv);

            match quote.option_type() {
                OptionType::Call => assert!((0.05..=0.95).contains(&quote.greeks.delta)),
                OptionType::Put => assert!((-0.95..=-0.05).contains(&quote.greeks.delta)),
            }
            assert!(quote.greeks.theta <= 0.0);
        }
    }

    #[test]
    fn test_strikes_skip_non_positive() {
        let synth = MarketDataSynthesizer::new();
        assert_eq!(synth.strikes(7.0), vec![2.0, 7.0, 12.0, 17.0, 22.0, 27.0]);
        assert_eq!(synth.strikes(100.4).len(), 9);
    }

    #[test]
    fn test_chain_rejects_bad_input() {
        let synth = MarketDataSynthesizer::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            synth.synthesize_options_chain("", 100.0, as_of(), &mut rng),
            Err(DeskError::InvalidSymbol(_))
        ));
        assert!(matches!(
            synth.synthesize_options_chain("SPY", 0.0, as_of(), &mut rng),
            Err(DeskError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_synthetic_delta_shape() {
        let time = 30.0 / 365.0;
        let atm = synthetic_delta(OptionType::Call, 100.0, 100.0, 30.0, time);
        assert!((atm - 0.5).abs() < 1e-9);

        let deep_itm = synthetic_delta(OptionType::Call, 150.0, 100.0, 30.0, time);
        assert_eq!(deep_itm, 0.95);
        let deep_otm_put = synthetic_delta(OptionType::Put, 150.0, 100.0, 30.0, time);
        assert_eq!(deep_otm_put, -0.05);

        let lower = synthetic_delta(OptionType::Call, 100.0, 105.0, 30.0, time);
        let higher = synthetic_delta(OptionType::Call, 100.0, 95.0, 30.0, time);
        assert!(lower < atm && atm < higher);
    }

    proptest! {
        #[test]
        fn prop_current_price_in_range(symbol in "[A-Za-z]{1,6}", seed in any::<u64>()) {
            let synth = MarketDataSynthesizer::new();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let quote = synth.synthesize_quote(&symbol, as_of(), &mut rng).unwrap();

            prop_assert!(quote.current_price >= 50.0 && quote.current_price < 250.0);
            prop_assert!(quote.is_chronological());
            prop_assert!(quote.history.iter().all(|b| b.is_well_formed()));
        }

        #[test]
        fn prop_chain_moneyness_and_pairing(symbol in "[A-Z]{1,5}", seed in any::<u64>()) {
            let synth = MarketDataSynthesizer::new();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let base = synth.base_price(&symbol).unwrap();
            let chain = synth.synthesize_options_chain(&symbol, base, as_of(), &mut rng).unwrap();

            prop_assert!(chain.is_paired());
            for quote in chain.quotes() {
                let expected = match quote.option_type() {
                    OptionType::Call => chain.current_price > quote.strike(),
                    OptionType::Put => chain.current_price < quote.strike(),
                };
                prop_assert_eq!(quote.in_the_money, expected);
            }
        }
    }
}
