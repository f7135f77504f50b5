//! Order tickets and confirmations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{DeskError, DeskResult, OptionQuote};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    #[default]
    Day,
    Gtc,
}

/// An options order as submitted to a broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// OCC option symbol
    pub symbol: String,
    pub side: OrderSide,
    /// Number of contracts
    pub quantity: u32,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    /// Required for limit orders, absent for market orders
    pub limit_price: Option<f64>,
}

impl OrderRequest {
    /// Market day order for a quoted contract
    pub fn market(quote: &OptionQuote, side: OrderSide, quantity: u32) -> DeskResult<Self> {
        Ok(Self {
            symbol: quote.contract.occ_symbol()?,
            side,
            quantity,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Day,
            limit_price: None,
        })
    }

    /// Limit day order for a quoted contract
    pub fn limit(
        quote: &OptionQuote,
        side: OrderSide,
        quantity: u32,
        limit_price: f64,
    ) -> DeskResult<Self> {
        Ok(Self {
            order_type: OrderType::Limit,
            limit_price: Some(limit_price),
            ..Self::market(quote, side, quantity)?
        })
    }

    pub fn validate(&self) -> DeskResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(DeskError::order("order symbol is empty"));
        }
        if self.quantity == 0 {
            return Err(DeskError::order("quantity must be at least 1"));
        }
        match (self.order_type, self.limit_price) {
            (OrderType::Limit, Some(p)) if p.is_finite() && p > 0.0 => Ok(()),
            (OrderType::Limit, _) => Err(DeskError::order("limit orders need a positive limit price")),
            (OrderType::Market, None) => Ok(()),
            (OrderType::Market, Some(_)) => {
                Err(DeskError::order("market orders cannot carry a limit price"))
            }
        }
    }

    /// Premium outlay at a per-share price
    pub fn estimated_cost(&self, price_per_share: f64, multiplier: f64) -> f64 {
        price_per_share * self.quantity as f64 * multiplier
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Accepted,
    Filled,
    Rejected,
}

/// Broker's answer to a submitted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub id: String,
    pub status: OrderStatus,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: u32,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub filled_quantity: u32,
    pub filled_avg_price: Option<f64>,
    pub submitted_at: DateTime<Utc>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionContract;
    use chrono::NaiveDate;

    fn quote() -> OptionQuote {
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        OptionQuote::new(OptionContract::call("AAPL", 180.0, expiry), 4.65)
    }

    #[test]
    fn test_market_order() {
        let order = OrderRequest::market(&quote(), OrderSide::Buy, 2).unwrap();
        assert_eq!(order.symbol, "AAPL250321C00180000");
        assert!(order.validate().is_ok());
        assert!((order.estimated_cost(4.65, 100.0) - 930.0).abs() < 1e-9);
    }

    #[test]
    fn test_validation() {
        let mut order = OrderRequest::limit(&quote(), OrderSide::Sell, 1, 4.70).unwrap();
        assert!(order.validate().is_ok());

        order.limit_price = None;
        assert!(matches!(order.validate(), Err(DeskError::Order(_))));

        order.limit_price = Some(-1.0);
        assert!(order.validate().is_err());

        let mut order = OrderRequest::market(&quote(), OrderSide::Buy, 0).unwrap();
        assert!(order.validate().is_err());
        order.quantity = 1;
        order.limit_price = Some(4.0);
        assert!(order.validate().is_err());
    }

    #[test]
    fn test_wire_format() {
        let order = OrderRequest::market(&quote(), OrderSide::Buy, 1).unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["side"], "buy");
        assert_eq!(json["order_type"], "market");
        assert_eq!(json["time_in_force"], "day");
    }
}
