//! Yahoo Finance data fetcher
//!
//! Live stock history and options chains from Yahoo Finance's unofficial
//! API, mapped onto the same records the synthesizer produces.
//!
//! Note: Yahoo Finance data is delayed ~15 minutes and intended for
//! personal use.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::{debug, warn};

use super::provider::{DataSource, MarketDataProvider};
use crate::core::{
    DeskError, DeskResult, Greeks, OptionContract, OptionQuote, OptionType, OptionsChain,
    PriceBar, StockQuote,
};

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new() -> DeskResult<Self> {
        Self::with_base_url("https://query1.finance.yahoo.com")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> DeskResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DeskError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> DeskResult<T> {
        debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .map_err(|e| DeskError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| DeskError::Network(e.to_string()))?
            .json()
            .map_err(|e| DeskError::Data(format!("Failed to parse response: {}", e)))
    }

    /// Daily history for the last `range` (e.g. "1mo")
    pub fn get_quote(&self, symbol: &str, range: &str) -> DeskResult<StockQuote> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url, symbol, range
        );
        let response: YahooChartResponse = self.get_json(&url)?;

        let result = response
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| DeskError::data(format!("No chart data returned for {}", symbol)))?;

        let history = chart_to_bars(&result);
        StockQuote::from_history(symbol, history)
            .ok_or_else(|| DeskError::data(format!("Empty price history for {}", symbol)))
    }

    /// Get available option expiration dates
    pub fn get_expirations(&self, symbol: &str) -> DeskResult<Vec<NaiveDate>> {
        let url = format!("{}/v7/finance/options/{}", self.base_url, symbol);
        let chain = self.fetch_options(&url)?;

        Ok(chain
            .expiration_dates
            .iter()
            .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
            .collect())
    }

    /// Options chain over the first `max_expirations` expirations
    ///
    /// Expirations that fail to load stay listed with no contracts.
    pub fn get_options_chain(
        &self,
        symbol: &str,
        underlying_price: f64,
        max_expirations: usize,
    ) -> DeskResult<OptionsChain> {
        let expirations = self.get_expirations(symbol)?;
        let mut chain = OptionsChain::new(symbol, underlying_price);

        for expiry in expirations.into_iter().take(max_expirations) {
            chain.add_expiration(expiry);
            match self.get_expiry_quotes(symbol, expiry, underlying_price) {
                Ok(quotes) => quotes.into_iter().for_each(|q| chain.add_quote(q)),
                Err(e) => warn!("Failed to get chain for {} {}: {}", symbol, expiry, e),
            }
        }

        Ok(chain)
    }

    fn get_expiry_quotes(
        &self,
        symbol: &str,
        expiry: NaiveDate,
        underlying_price: f64,
    ) -> DeskResult<Vec<OptionQuote>> {
        let expiry_ts = expiry
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| DeskError::data("invalid expiry timestamp"))?
            .and_utc()
            .timestamp();
        let url = format!(
            "{}/v7/finance/options/{}?date={}",
            self.base_url, symbol, expiry_ts
        );
        let data = self.fetch_options(&url)?;

        let mut quotes = Vec::new();
        if let Some(options) = data.options.first() {
            let calls = options.calls.iter().map(|c| (c, OptionType::Call));
            let puts = options.puts.iter().map(|p| (p, OptionType::Put));
            for (raw, option_type) in calls.chain(puts) {
                if let Some(q) = convert_option_quote(raw, symbol, expiry, option_type, underlying_price) {
                    quotes.push(q);
                }
            }
        }
        Ok(quotes)
    }

    fn fetch_options(&self, url: &str) -> DeskResult<YahooOptionChainData> {
        let response: YahooOptionsResponse = self.get_json(url)?;
        response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| DeskError::data("No options data returned"))
    }
}

/// Live market data through Yahoo Finance
pub struct LiveProvider {
    client: YahooClient,
    max_expirations: usize,
}

impl LiveProvider {
    pub fn new(client: YahooClient, max_expirations: usize) -> Self {
        Self {
            client,
            max_expirations,
        }
    }
}

impl MarketDataProvider for LiveProvider {
    fn source(&self) -> DataSource {
        DataSource::Live
    }

    fn fetch_quote(&mut self, symbol: &str, _as_of: NaiveDate) -> DeskResult<StockQuote> {
        self.client.get_quote(symbol, "1mo")
    }

    fn fetch_options_chain(
        &mut self,
        symbol: &str,
        underlying_price: f64,
        _as_of: NaiveDate,
    ) -> DeskResult<OptionsChain> {
        self.client
            .get_options_chain(symbol, underlying_price, self.max_expirations)
    }
}

fn chart_to_bars(result: &YahooChartResult) -> Vec<PriceBar> {
    let Some(q) = result.indicators.quote.first() else {
        return Vec::new();
    };

    result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = DateTime::from_timestamp(ts, 0)?.date_naive();
            Some(PriceBar {
                date,
                open: (*q.open.get(i)?)?,
                high: (*q.high.get(i)?)?,
                low: (*q.low.get(i)?)?,
                close: (*q.close.get(i)?)?,
                volume: q.volume.get(i).copied().flatten().unwrap_or(0),
            })
        })
        .collect()
}

/// Convert Yahoo option data to our quote format
fn convert_option_quote(
    data: &YahooOptionData,
    underlying: &str,
    expiry: NaiveDate,
    option_type: OptionType,
    underlying_price: f64,
) -> Option<OptionQuote> {
    let strike = data.strike?;
    let contract = OptionContract::new(underlying, strike, expiry, option_type);

    let bid = data.bid.unwrap_or(0.0).max(0.0);
    let ask = data.ask.unwrap_or(bid).max(bid);
    let premium = data
        .last_price
        .filter(|&p| p > 0.0)
        .unwrap_or((bid + ask) / 2.0);

    let in_the_money = contract.is_itm(underlying_price);
    Some(OptionQuote {
        contract,
        premium,
        bid,
        ask,
        volume: data.volume.unwrap_or(0).max(0) as u64,
        open_interest: data.open_interest.unwrap_or(0).max(0) as u64,
        // Yahoo quotes IV as a fraction
        implied_volatility: data.implied_volatility.unwrap_or(0.0) * 100.0,
        greeks: Greeks {
            delta: data.delta.unwrap_or(0.0),
            gamma: data.gamma.unwrap_or(0.0),
            theta: data.theta.unwrap_or(0.0),
            vega: data.vega.unwrap_or(0.0),
        },
        in_the_money,
    })
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    result: Vec<YahooOptionChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    strike: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    volume: Option<i64>,
    #[serde(rename = "openInterest")]
    open_interest: Option<i64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
    // Greeks (may not always be present)
    delta: Option<f64>,
    gamma: Option<f64>,
    theta: Option<f64>,
    vega: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_option_quote() {
        let raw: YahooOptionData = serde_json::from_str(
            r#"{"strike": 180.0, "bid": 4.6, "ask": 4.7, "lastPrice": 4.65,
                "volume": 1823, "openInterest": 4250, "impliedVolatility": 0.275}"#,
        )
        .unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        let quote = convert_option_quote(&raw, "AAPL", expiry, OptionType::Call, 178.72).unwrap();

        assert_eq!(quote.premium, 4.65);
        assert_eq!(quote.volume, 1823);
        assert_eq!(quote.open_interest, 4250);
        assert!((quote.implied_volatility - 27.5).abs() < 1e-9);
        assert!(!quote.in_the_money);
        assert_eq!(quote.greeks, Greeks::default());
    }

    #[test]
    fn test_convert_without_last_price_uses_mid() {
        let raw: YahooOptionData =
            serde_json::from_str(r#"{"strike": 175.0, "bid": 5.0, "ask": 5.4}"#).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        let quote = convert_option_quote(&raw, "AAPL", expiry, OptionType::Put, 178.72).unwrap();
        assert!((quote.premium - 5.2).abs() < 1e-9);

        let no_strike: YahooOptionData = serde_json::from_str(r#"{"bid": 1.0}"#).unwrap();
        assert!(convert_option_quote(&no_strike, "AAPL", expiry, OptionType::Put, 178.72).is_none());
    }

    #[test]
    fn test_chart_skips_null_bars() {
        let result: YahooChartResult = serde_json::from_str(
            r#"{"timestamp": [1740700800, 1740787200, 1740960000],
                "indicators": {"quote": [{
                    "open":  [176.0, null, 178.0],
                    "high":  [177.0, null, 179.5],
                    "low":   [175.5, null, 177.2],
                    "close": [176.38, null, 178.72],
                    "volume": [1000, null, null]
                }]}}"#,
        )
        .unwrap();

        let bars = chart_to_bars(&result);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 178.72);
        assert_eq!(bars[1].volume, 0);
        assert!(bars.iter().all(|b| b.is_well_formed()));
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_quote() {
        let client = YahooClient::new().unwrap();
        let quote = client.get_quote("SPY", "1mo").unwrap();
        assert!(quote.current_price > 0.0);
        assert!(quote.is_chronological());
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_options_chain() {
        let client = YahooClient::new().unwrap();
        let quote = client.get_quote("SPY", "1mo").unwrap();
        let chain = client.get_options_chain("SPY", quote.current_price, 2).unwrap();
        assert!(!chain.expirations.is_empty());
        assert!(chain.total_contracts() > 0);
    }
}
