//! Core data types for the options desk
//!
//! Defines fundamental types:
//! - OptionContract: Strike, expiry, type (call/put)
//! - OptionQuote: Premium, bid/ask, activity, IV, Greeks
//! - StockQuote: Underlying price and daily history
//! - OptionsChain: Calls and puts across expirations

pub mod option;
pub mod quote;
pub mod chain;
pub mod greeks;
pub mod error;

pub use option::*;
pub use quote::*;
pub use chain::*;
pub use greeks::*;
pub use error::*;
