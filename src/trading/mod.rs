//! Order entry
//!
//! Order tickets for listed options, OCC symbology and a simulated paper
//! broker.

mod broker;
mod order;

pub use broker::*;
pub use order::*;
