//! Implied volatility term structure
//!
//! Buckets a chain's IV by horizon: each bucket takes the expiration whose
//! days-to-expiry is closest to the bucket (earliest date on ties) and
//! averages every positive IV listed there. An average of 0.0 means there
//! was nothing to average, not a low reading.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::config::IvStrategyConfig;
use super::strategy::{classify_iv_strategy, IvStrategy};
use crate::core::OptionsChain;

/// 30, 60 and 90 days
pub const DEFAULT_TERM_BUCKETS: [i64; 3] = [30, 60, 90];

/// Average IV for one horizon bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermStructurePoint {
    /// Bucket horizon in days
    pub days: i64,
    /// Expiration chosen for the bucket
    pub expiry: Option<NaiveDate>,
    /// Average IV in percent, 0.0 when no contract qualified
    pub average_iv: f64,
}

impl TermStructurePoint {
    pub fn has_data(&self) -> bool {
        self.average_iv > 0.0
    }
}

/// One point per bucket, in bucket order
pub fn implied_volatility_term_structure(
    chain: &OptionsChain,
    reference_days_buckets: &[i64],
    as_of: NaiveDate,
) -> Vec<TermStructurePoint> {
    reference_days_buckets
        .iter()
        .map(|&days| {
            let expiry = nearest_expiration(chain, days, as_of);
            let average_iv = expiry.map(|e| average_iv_at(chain, e)).unwrap_or(0.0);
            TermStructurePoint {
                days,
                expiry,
                average_iv,
            }
        })
        .collect()
}

/// Expiration whose days-to-expiry is closest to `target_days`
pub fn nearest_expiration(
    chain: &OptionsChain,
    target_days: i64,
    as_of: NaiveDate,
) -> Option<NaiveDate> {
    chain
        .expirations
        .iter()
        .copied()
        .min_by_key(|&e| (((e - as_of).num_days() - target_days).abs(), e))
}

/// Mean of positive IVs across calls and puts at one expiration
pub fn average_iv_at(chain: &OptionsChain, expiry: NaiveDate) -> f64 {
    let (sum, count) = chain
        .quotes_for_expiry(expiry)
        .map(|q| q.implied_volatility)
        .filter(|&iv| iv > 0.0)
        .fold((0.0, 0usize), |(sum, count), iv| (sum + iv, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Chain-level IV summary anchored on the front expiration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IvTermPoint {
    /// Front (nearest unexpired) expiration
    pub expiry: NaiveDate,
    /// e.g. "Apr 18, 2025 (46d)"
    pub display_label: String,
    pub days_to_expiry: i64,
    pub iv30_equivalent: f64,
    pub iv60_equivalent: f64,
    pub iv90_equivalent: f64,
    pub strategy: IvStrategy,
    pub rationale: String,
}

/// Summarize a chain's 30/60/90-day IV and classify it
///
/// Returns `None` when the chain lists no unexpired expiration.
pub fn summarize_iv_term(
    chain: &OptionsChain,
    as_of: NaiveDate,
    config: &IvStrategyConfig,
) -> Option<IvTermPoint> {
    let expiry = chain.expirations.iter().copied().filter(|&e| e >= as_of).min()?;
    let days_to_expiry = (expiry - as_of).num_days();

    let points = implied_volatility_term_structure(chain, &DEFAULT_TERM_BUCKETS, as_of);
    let (iv30, iv60, iv90) = (points[0].average_iv, points[1].average_iv, points[2].average_iv);
    let insight = classify_iv_strategy(iv30, iv60, iv90, config);

    Some(IvTermPoint {
        expiry,
        display_label: format!("{} ({}d)", expiry.format("%b %d, %Y"), days_to_expiry),
        days_to_expiry,
        iv30_equivalent: iv30,
        iv60_equivalent: iv60,
        iv90_equivalent: iv90,
        strategy: insight.strategy,
        rationale: insight.rationale,
    })
}
