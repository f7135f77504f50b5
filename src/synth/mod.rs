//! Synthetic market data
//!
//! Generates a stock quote with daily history and a call/put options chain
//! for any symbol, with no network access:
//! - **Base price**: a pure function of the symbol's character codes
//! - **Expirations**: monthly, snapped to the third Friday
//! - **Contracts**: intrinsic plus IV-scaled time value, placeholder Greeks

mod calendar;
mod config;
mod synthesizer;

pub use calendar::*;
pub use config::*;
pub use synthesizer::*;
