//! Market data access
//!
//! Handles:
//! - Synthetic quotes and chains (default, offline)
//! - Yahoo Finance API for live quotes and chains

pub mod provider;
pub mod yahoo;

pub use provider::*;
pub use yahoo::*;
