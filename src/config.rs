//! Desk configuration
//!
//! One serde document covering data source, synthesis and analytics
//! settings. Missing fields fall back to defaults, so `{}` is a valid config.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analytics::{IvStrategyConfig, DEFAULT_PRICE_MULTIPLIERS, DEFAULT_TERM_BUCKETS};
use crate::core::{DeskError, DeskResult};
use crate::data::DataSource;
use crate::synth::SynthesisConfig;

/// Configuration for the options desk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Where quotes and chains come from
    /// Default: synthetic
    pub data_source: DataSource,

    /// Seed for synthetic data and paper order ids; `None` uses entropy
    pub seed: Option<u64>,

    /// Synthetic generator settings
    pub synthesis: SynthesisConfig,

    /// Term-structure classification thresholds
    pub strategy: IvStrategyConfig,

    /// Price multipliers for expiry P&L scenarios
    /// Default: [0.9, 1.0, 1.1]
    pub scenario_multipliers: Vec<f64>,

    /// IV term-structure horizons in days
    /// Default: [30, 60, 90]
    pub term_buckets: Vec<i64>,

    /// Expirations fetched per live chain
    /// Default: 4
    pub live_expirations: usize,

    /// Serve synthetic data when a live fetch fails
    /// Default: true
    pub fallback_to_synthetic: bool,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::Synthetic,
            seed: None,
            synthesis: SynthesisConfig::default(),
            strategy: IvStrategyConfig::default(),
            scenario_multipliers: DEFAULT_PRICE_MULTIPLIERS.to_vec(),
            term_buckets: DEFAULT_TERM_BUCKETS.to_vec(),
            live_expirations: 4,
            fallback_to_synthetic: true,
        }
    }
}

impl DeskConfig {
    /// Reproducible synthetic desk
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Live data with synthetic fallback
    pub fn live() -> Self {
        Self {
            data_source: DataSource::Live,
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> DeskResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| DeskError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> DeskResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> DeskResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DeskError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> DeskResult<()> {
        self.synthesis.validate()?;
        if self.term_buckets.iter().any(|&d| d < 0) {
            return Err(DeskError::config("term buckets must be non-negative"));
        }
        if self
            .scenario_multipliers
            .iter()
            .any(|m| !m.is_finite() || *m < 0.0)
        {
            return Err(DeskError::config("scenario multipliers must be non-negative"));
        }
        if !(self.strategy.historical_avg_iv > 0.0) {
            return Err(DeskError::config("historical average IV must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_document_is_default() {
        let config = DeskConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DeskConfig::default());
        assert_eq!(config.term_buckets, vec![30, 60, 90]);
    }

    #[test]
    fn test_presets() {
        let live = DeskConfig::live();
        assert_eq!(live.data_source, DataSource::Live);
        assert!(live.fallback_to_synthetic);
        assert_eq!(live.seed, None);

        let seeded = DeskConfig::seeded(3);
        assert_eq!(seeded.data_source, DataSource::Synthetic);
        assert_eq!(seeded.seed, Some(3));
    }

    #[test]
    fn test_nested_overrides() {
        let config = DeskConfig::from_json_str(
            r#"{"data_source": "live", "seed": 7,
                "synthesis": {"populated_expirations": 4},
                "strategy": {"historical_avg_iv": 30.0}}"#,
        )
        .unwrap();

        assert_eq!(config.data_source, DataSource::Live);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.synthesis.populated_expirations, 4);
        assert_eq!(config.synthesis.strike_step, 5.0);
        assert_eq!(config.strategy.historical_avg_iv, 30.0);
        assert_eq!(config.strategy.elevated_multiplier, 1.6);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            DeskConfig::from_json_str("not json"),
            Err(DeskError::Serialization(_))
        ));
        assert!(matches!(
            DeskConfig::from_json_str(r#"{"term_buckets": [-30]}"#),
            Err(DeskError::Config(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let config = DeskConfig::seeded(11);
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config.to_json_pretty().unwrap().as_bytes()).unwrap();

        let loaded = DeskConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, config);

        assert!(matches!(
            DeskConfig::from_json_file("/nonexistent/desk.json"),
            Err(DeskError::IO(_))
        ));
    }
}
