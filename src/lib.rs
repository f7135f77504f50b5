//! # Options Desk - Stock and Options Analytics
//!
//! Look up a ticker, browse its options chain, inspect one contract and
//! read the implied-volatility term structure, with synthetic data when no
//! live feed is available.
//!
//! ## Key Components
//!
//! - **Synthesis**: deterministic-per-seed quotes, history and chains
//! - **Data**: synthetic provider, Yahoo Finance live provider
//! - **Analytics**: moneyness, break-even, intrinsic/time value, expiry P&L
//! - **Term structure**: 30/60/90-day IV with a strategy classification
//! - **Trading**: OCC symbols, order tickets and a paper broker
//!
//! ## Usage
//!
//! ```rust,no_run
//! use options_desk::prelude::*;
//!
//! let mut desk = OptionsDesk::new(DeskConfig::seeded(42)).unwrap();
//! let snapshot = desk.lookup("aapl").unwrap();
//!
//! let expiry = snapshot.chain.populated_expirations()[0];
//! let strike = snapshot.chain.atm_strike(expiry).unwrap();
//! let view = desk.select(&snapshot, OptionType::Call, expiry, strike).unwrap();
//! println!("break-even {:.2}", view.break_even_price);
//!
//! if let Some(summary) = desk.iv_summary(&snapshot.chain) {
//!     println!("{}: {}", summary.strategy.label(), summary.rationale);
//! }
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Price options with a model (Greeks on synthetic data are placeholders)
//! - Persist anything between runs
//! - Send orders anywhere but the in-memory paper account

pub mod analytics;
pub mod config;
pub mod core;
pub mod data;
pub mod desk;
pub mod synth;
pub mod trading;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        DeskError, DeskResult, Greeks, OptionContract, OptionQuote, OptionType, OptionsChain,
        PriceBar, StockQuote,
    };

    // Data
    pub use crate::data::{
        DataSource, LiveProvider, MarketDataProvider, MarketSnapshot, SyntheticProvider,
        YahooClient,
    };
    pub use crate::synth::{MarketDataSynthesizer, SynthesisConfig};

    // Analytics
    pub use crate::analytics::{
        break_even_price, classify_iv_strategy, implied_volatility_term_structure, moneyness,
        profit_scenarios, IvStrategy, IvStrategyConfig, IvTermPoint, ProfitScenario,
        SelectedOptionView, StrategyInsight, TermStructurePoint,
    };

    // Trading
    pub use crate::trading::{
        AccountInfo, Broker, OrderConfirmation, OrderRequest, OrderSide, OrderStatus, PaperBroker,
    };

    // Desk
    pub use crate::config::DeskConfig;
    pub use crate::desk::OptionsDesk;
}

// Re-export main types at crate root
pub use crate::core::{DeskError, DeskResult};
pub use crate::desk::OptionsDesk;
