//! Option analytics
//!
//! Derived metrics for a selected contract (moneyness, break-even, intrinsic
//! and time value, expiry P&L) and IV term-structure analysis across a chain
//! with a heuristic strategy classification.

mod config;
mod metrics;
mod scenarios;
mod strategy;
mod term_structure;
mod view;

pub use config::*;
pub use metrics::*;
pub use scenarios::*;
pub use strategy::*;
pub use term_structure::*;
pub use view::*;
