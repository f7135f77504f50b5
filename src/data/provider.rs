//! Market data sources
//!
//! The desk asks a `MarketDataProvider` for a stock quote and an options
//! chain; which source answers is configuration, not analytics.

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::{DeskResult, OptionsChain, StockQuote};
use crate::synth::MarketDataSynthesizer;

/// Where quotes and chains come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Generated in-process, no network
    #[default]
    Synthetic,
    /// Fetched from Yahoo Finance
    Live,
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Synthetic => "synthetic",
            DataSource::Live => "live",
        }
    }
}

/// Supplier of stock quotes and options chains
///
/// `as_of` is the caller's notion of today. Live sources answer with current
/// market data regardless.
pub trait MarketDataProvider {
    fn source(&self) -> DataSource;

    fn fetch_quote(&mut self, symbol: &str, as_of: NaiveDate) -> DeskResult<StockQuote>;

    fn fetch_options_chain(
        &mut self,
        symbol: &str,
        underlying_price: f64,
        as_of: NaiveDate,
    ) -> DeskResult<OptionsChain>;
}

/// A quote and chain fetched together for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub quote: StockQuote,
    pub chain: OptionsChain,
    pub source: DataSource,
}

impl MarketSnapshot {
    /// Fetch the quote, then a chain around its current price
    pub fn fetch(
        provider: &mut dyn MarketDataProvider,
        symbol: &str,
        as_of: NaiveDate,
    ) -> DeskResult<Self> {
        let quote = provider.fetch_quote(symbol, as_of)?;
        let chain = provider.fetch_options_chain(symbol, quote.current_price, as_of)?;
        Ok(Self {
            quote,
            chain,
            source: provider.source(),
        })
    }
}

/// Synthetic data from a seeded generator
pub struct SyntheticProvider {
    synthesizer: MarketDataSynthesizer,
    rng: ChaCha8Rng,
}

impl SyntheticProvider {
    /// A fixed seed makes every lookup reproducible; `None` seeds from entropy
    pub fn new(synthesizer: MarketDataSynthesizer, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { synthesizer, rng }
    }
}

impl MarketDataProvider for SyntheticProvider {
    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch_quote(&mut self, symbol: &str, as_of: NaiveDate) -> DeskResult<StockQuote> {
        self.synthesizer.synthesize_quote(symbol, as_of, &mut self.rng)
    }

    /// The chain is built around the symbol's base price, so the chain's
    /// price can differ from the quote's noisy last close.
    fn fetch_options_chain(
        &mut self,
        symbol: &str,
        _underlying_price: f64,
        as_of: NaiveDate,
    ) -> DeskResult<OptionsChain> {
        let base = self.synthesizer.base_price(symbol)?;
        self.synthesizer
            .synthesize_options_chain(symbol, base, as_of, &mut self.rng)
    }
}
