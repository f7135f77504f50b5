//! OptionsDesk - Main facade for lookups, analytics and paper orders
//!
//! Ties a market data provider, the analytics and a broker together behind
//! one interface.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::analytics::{
    horizon_insight, implied_volatility_term_structure, summarize_iv_term, IvTermPoint,
    ProfitScenario, SelectedOptionView, StrategyInsight, TermStructurePoint,
};
use crate::config::DeskConfig;
use crate::core::{DeskError, DeskResult, OptionQuote, OptionType, OptionsChain};
use crate::data::{
    DataSource, LiveProvider, MarketDataProvider, MarketSnapshot, SyntheticProvider, YahooClient,
};
use crate::synth::MarketDataSynthesizer;
use crate::trading::{AccountInfo, Broker, OrderConfirmation, OrderRequest, PaperBroker};

/// Trim and uppercase a user-entered ticker
pub fn normalize_symbol(raw: &str) -> DeskResult<String> {
    let symbol = raw.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        return Err(DeskError::invalid_symbol("symbol is empty"));
    }
    Ok(symbol)
}

/// Options desk over one data source and one broker
pub struct OptionsDesk {
    config: DeskConfig,
    provider: Box<dyn MarketDataProvider>,
    fallback: Option<SyntheticProvider>,
    broker: Box<dyn Broker>,
    as_of: Option<NaiveDate>,
}

impl OptionsDesk {
    /// Create a desk for the configured data source
    pub fn new(config: DeskConfig) -> DeskResult<Self> {
        let provider: Box<dyn MarketDataProvider> = match config.data_source {
            DataSource::Synthetic => Box::new(synthetic_provider(&config)?),
            DataSource::Live => Box::new(LiveProvider::new(
                YahooClient::new()?,
                config.live_expirations,
            )),
        };
        Self::with_provider(config, provider)
    }

    /// Create with an explicit provider
    ///
    /// A live provider gets a synthetic fallback when the config allows it.
    pub fn with_provider(
        config: DeskConfig,
        provider: Box<dyn MarketDataProvider>,
    ) -> DeskResult<Self> {
        config.validate()?;
        let fallback = if provider.source() == DataSource::Live && config.fallback_to_synthetic {
            Some(synthetic_provider(&config)?)
        } else {
            None
        };
        let broker = Box::new(PaperBroker::new(config.seed));

        Ok(Self {
            config,
            provider,
            fallback,
            broker,
            as_of: None,
        })
    }

    /// Replace the broker
    pub fn with_broker(mut self, broker: Box<dyn Broker>) -> Self {
        self.broker = broker;
        self
    }

    /// Pin "today" instead of reading the clock
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Quote and chain for a ticker
    ///
    /// Network and data failures from a live source fall back to synthetic
    /// data when configured; the snapshot's `source` says which answered.
    pub fn lookup(&mut self, raw_symbol: &str) -> DeskResult<MarketSnapshot> {
        let symbol = normalize_symbol(raw_symbol)?;
        let as_of = self.today();

        let snapshot = match MarketSnapshot::fetch(self.provider.as_mut(), &symbol, as_of) {
            Ok(snapshot) => snapshot,
            Err(e @ (DeskError::Network(_) | DeskError::Data(_))) => match self.fallback.as_mut() {
                Some(fallback) => {
                    warn!("Live data for {} unavailable ({}), using synthetic data", symbol, e);
                    MarketSnapshot::fetch(fallback, &symbol, as_of)?
                }
                None => return Err(e),
            },
            Err(e) => return Err(e),
        };

        info!(
            "{} {:.2} ({}): {} expirations, {} contracts",
            symbol,
            snapshot.quote.current_price,
            snapshot.source.label(),
            snapshot.chain.expirations.len(),
            snapshot.chain.total_contracts()
        );
        Ok(snapshot)
    }

    /// Contract at the ATM strike shifted by `strike_offset` steps
    ///
    /// The offset is clamped to the listed strikes.
    pub fn pick_quote<'a>(
        &self,
        chain: &'a OptionsChain,
        option_type: OptionType,
        expiry: NaiveDate,
        strike_offset: i32,
    ) -> Option<&'a OptionQuote> {
        let strikes = chain.strikes_for_expiry(expiry);
        let atm = chain.atm_strike(expiry)?;
        let atm_index = strikes.iter().position(|&k| k == atm)? as i64;
        let last = strikes.len() as i64 - 1;
        let index = (atm_index + strike_offset as i64).clamp(0, last) as usize;
        chain.quote_at(option_type, expiry, strikes[index])
    }

    /// Derived metrics for one contract in a snapshot
    pub fn select(
        &self,
        snapshot: &MarketSnapshot,
        option_type: OptionType,
        expiry: NaiveDate,
        strike: f64,
    ) -> DeskResult<SelectedOptionView> {
        let quote = snapshot
            .chain
            .quote_at(option_type, expiry, strike)
            .ok_or_else(|| {
                DeskError::invalid_input(format!(
                    "no {} {} {} in chain",
                    snapshot.chain.symbol,
                    expiry,
                    option_type.label()
                ))
            })?;
        let view = SelectedOptionView::new(quote, &snapshot.quote, self.today())?;

        if view.is_anomalous() {
            warn!(
                "{} {} {} quoted below intrinsic ({:.2} < {:.2})",
                quote.contract.underlying,
                strike,
                option_type.label(),
                quote.premium,
                view.intrinsic_value
            );
        }
        debug!(
            "Selected {} {} {}: moneyness {:.2}%, break-even {:.2}",
            quote.contract.underlying,
            strike,
            option_type.label(),
            view.moneyness,
            view.break_even_price
        );
        Ok(view)
    }

    /// Expiry P&L at the configured price multipliers
    pub fn scenarios(&self, view: &SelectedOptionView) -> DeskResult<Vec<ProfitScenario>> {
        view.scenarios(&self.config.scenario_multipliers)
    }

    /// Average IV at the configured horizons
    pub fn term_structure(&self, chain: &OptionsChain) -> Vec<TermStructurePoint> {
        implied_volatility_term_structure(chain, &self.config.term_buckets, self.today())
    }

    /// 30/60/90-day summary with strategy classification
    pub fn iv_summary(&self, chain: &OptionsChain) -> Option<IvTermPoint> {
        let summary = summarize_iv_term(chain, self.today(), &self.config.strategy)?;
        debug!(
            "{} IV term: {:.1}/{:.1}/{:.1} -> {}",
            chain.symbol,
            summary.iv30_equivalent,
            summary.iv60_equivalent,
            summary.iv90_equivalent,
            summary.strategy.label()
        );
        Some(summary)
    }

    /// Per-horizon hints over the configured term structure
    pub fn horizon_insights(&self, chain: &OptionsChain) -> Vec<(TermStructurePoint, StrategyInsight)> {
        self.term_structure(chain)
            .into_iter()
            .map(|point| {
                let insight = horizon_insight(point.days, point.average_iv, &self.config.strategy);
                (point, insight)
            })
            .collect()
    }

    pub fn account(&self) -> DeskResult<AccountInfo> {
        self.broker.account()
    }

    /// Submit an order for a quoted contract, marked at its premium
    pub fn place_order(
        &mut self,
        order: &OrderRequest,
        quote: &OptionQuote,
    ) -> DeskResult<OrderConfirmation> {
        let symbol = quote.contract.occ_symbol()?;
        if order.symbol != symbol {
            return Err(DeskError::order(format!(
                "order for {} does not match quoted {}",
                order.symbol, symbol
            )));
        }
        self.broker.submit(order, quote.premium)
    }
}

fn synthetic_provider(config: &DeskConfig) -> DeskResult<SyntheticProvider> {
    let synthesizer = MarketDataSynthesizer::with_config(config.synthesis.clone())?;
    Ok(SyntheticProvider::new(synthesizer, config.seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::IvStrategy;
    use crate::trading::{OrderSide, OrderStatus};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn desk(seed: u64) -> OptionsDesk {
        OptionsDesk::new(DeskConfig::seeded(seed))
            .unwrap()
            .with_as_of(as_of())
    }

    /// Live source that is always down
    struct Offline;

    impl MarketDataProvider for Offline {
        fn source(&self) -> DataSource {
            DataSource::Live
        }

        fn fetch_quote(&mut self, _symbol: &str, _as_of: NaiveDate) -> DeskResult<crate::core::StockQuote> {
            Err(DeskError::Network("connection refused".to_string()))
        }

        fn fetch_options_chain(
            &mut self,
            _symbol: &str,
            _underlying_price: f64,
            _as_of: NaiveDate,
        ) -> DeskResult<OptionsChain> {
            Err(DeskError::Network("connection refused".to_string()))
        }
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("  aapl ").unwrap(), "AAPL");
        assert!(matches!(normalize_symbol("   "), Err(DeskError::InvalidSymbol(_))));
    }

    #[test]
    fn test_lookup_normalizes() {
        let mut desk = desk(42);
        let snapshot = desk.lookup(" aapl").unwrap();

        assert_eq!(snapshot.quote.symbol, "AAPL");
        assert_eq!(snapshot.chain.symbol, "AAPL");
        assert_eq!(snapshot.source, DataSource::Synthetic);
        assert_eq!(snapshot.chain.current_price, 136.0);
        assert!(snapshot.chain.is_paired());
    }

    #[test]
    fn test_select_and_scenarios() {
        let mut desk = desk(42);
        let snapshot = desk.lookup("AAPL").unwrap();
        let expiry = snapshot.chain.populated_expirations()[0];

        let view = desk.select(&snapshot, OptionType::Call, expiry, 136.0).unwrap();
        assert_eq!(view.quote.strike(), 136.0);
        assert_eq!(view.days_to_expiration, (expiry - as_of()).num_days());
        assert!(view.underlying_change_pct.is_some());

        let scenarios = desk.scenarios(&view).unwrap();
        assert_eq!(scenarios.len(), 3);

        assert!(matches!(
            desk.select(&snapshot, OptionType::Call, expiry, 137.5),
            Err(DeskError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_selected_flags_agree_across_seeds() {
        for seed in 0..40 {
            let mut desk = desk(seed);
            let snapshot = desk.lookup("AAPL").unwrap();
            let expiry = snapshot.chain.populated_expirations()[0];
            let atm = snapshot.chain.atm_strike(expiry).unwrap();

            for option_type in [OptionType::Call, OptionType::Put] {
                let view = desk.select(&snapshot, option_type, expiry, atm).unwrap();
                assert_eq!(view.quote.in_the_money, view.in_the_money, "seed {}", seed);
                assert_eq!(
                    view.in_the_money,
                    view.quote.contract.is_itm(snapshot.quote.current_price)
                );
            }
        }
    }

    #[test]
    fn test_with_broker() {
        let account = AccountInfo {
            cash: 1_000.0,
            buying_power: 1_000.0,
            ..AccountInfo::default()
        };
        let mut desk = desk(42).with_broker(Box::new(PaperBroker::with_account(account, Some(1))));
        assert_eq!(desk.account().unwrap().cash, 1_000.0);

        let snapshot = desk.lookup("AAPL").unwrap();
        let expiry = snapshot.chain.populated_expirations()[0];
        let quote = desk
            .pick_quote(&snapshot.chain, OptionType::Call, expiry, 0)
            .unwrap()
            .clone();
        // 5 contracts of a multi-dollar premium exceed 1,000 of buying power
        let order = OrderRequest::market(&quote, OrderSide::Buy, 5).unwrap();
        assert!(quote.premium * 500.0 > 1_000.0);
        assert!(matches!(desk.place_order(&order, &quote), Err(DeskError::Order(_))));
    }

    #[test]
    fn test_pick_quote_clamps_offset() {
        let mut desk = desk(42);
        let snapshot = desk.lookup("AAPL").unwrap();
        let expiry = snapshot.chain.populated_expirations()[0];
        let chain = &snapshot.chain;

        let atm = desk.pick_quote(chain, OptionType::Put, expiry, 0).unwrap();
        assert_eq!(atm.strike(), 136.0);
        assert_eq!(atm.option_type(), OptionType::Put);

        let up = desk.pick_quote(chain, OptionType::Call, expiry, 2).unwrap();
        assert_eq!(up.strike(), 146.0);

        let floor = desk.pick_quote(chain, OptionType::Call, expiry, -50).unwrap();
        assert_eq!(floor.strike(), 116.0);
    }

    #[test]
    fn test_iv_views() {
        let mut desk = desk(7);
        let snapshot = desk.lookup("MSFT").unwrap();

        let points = desk.term_structure(&snapshot.chain);
        assert_eq!(points.iter().map(|p| p.days).collect::<Vec<_>>(), vec![30, 60, 90]);

        let summary = desk.iv_summary(&snapshot.chain).unwrap();
        assert!(summary.days_to_expiry > 0);
        assert_ne!(summary.strategy, IvStrategy::Insufficient);

        let insights = desk.horizon_insights(&snapshot.chain);
        assert_eq!(insights.len(), 3);
    }

    #[test]
    fn test_live_failure_falls_back() {
        let mut desk = OptionsDesk::with_provider(DeskConfig::seeded(3), Box::new(Offline))
            .unwrap()
            .with_as_of(as_of());
        let snapshot = desk.lookup("AAPL").unwrap();
        assert_eq!(snapshot.source, DataSource::Synthetic);

        let config = DeskConfig {
            fallback_to_synthetic: false,
            ..DeskConfig::seeded(3)
        };
        let mut strict = OptionsDesk::with_provider(config, Box::new(Offline)).unwrap();
        assert!(matches!(strict.lookup("AAPL"), Err(DeskError::Network(_))));
    }

    #[test]
    fn test_place_order() {
        let mut desk = desk(42);
        let snapshot = desk.lookup("AAPL").unwrap();
        let expiry = snapshot.chain.populated_expirations()[0];
        let quote = desk
            .pick_quote(&snapshot.chain, OptionType::Call, expiry, 0)
            .unwrap()
            .clone();

        let order = OrderRequest::market(&quote, OrderSide::Buy, 1).unwrap();
        let conf = desk.place_order(&order, &quote).unwrap();
        assert_eq!(conf.status, OrderStatus::Filled);
        assert_eq!(conf.filled_avg_price, Some(quote.premium));

        let cash = desk.account().unwrap().cash;
        assert!((cash - (25_000.0 - quote.premium * 100.0)).abs() < 1e-6);

        let other = desk
            .pick_quote(&snapshot.chain, OptionType::Put, expiry, 0)
            .unwrap();
        assert!(matches!(
            desk.place_order(&order, other),
            Err(DeskError::Order(_))
        ));
    }
}
