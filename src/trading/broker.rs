//! Order routing
//!
//! `Broker` is the seam to whatever executes orders. `PaperBroker` simulates
//! an account in memory and never leaves the process.

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::order::{OrderConfirmation, OrderRequest, OrderSide, OrderStatus, OrderType};
use crate::core::{DeskError, DeskResult, EQUITY_CONTRACT_MULTIPLIER};

/// Brokerage account summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: String,
    pub cash: f64,
    pub portfolio_value: f64,
    pub buying_power: f64,
    pub equity: f64,
    pub status: String,
}

impl Default for AccountInfo {
    fn default() -> Self {
        Self {
            id: "paper-account".to_string(),
            cash: 25_000.0,
            portfolio_value: 27_350.75,
            buying_power: 50_000.0,
            equity: 27_350.75,
            status: "ACTIVE".to_string(),
        }
    }
}

/// Executes option orders
pub trait Broker {
    fn account(&self) -> DeskResult<AccountInfo>;

    /// Submit an order. `mark` is the contract's current premium per share,
    /// used to price market orders and check buying power.
    fn submit(&mut self, order: &OrderRequest, mark: f64) -> DeskResult<OrderConfirmation>;
}

/// In-memory simulated broker
///
/// Market orders fill in full at the mark. Limit orders fill at the limit
/// when marketable and otherwise rest as accepted. Buys are rejected past
/// buying power.
pub struct PaperBroker {
    account: AccountInfo,
    rng: ChaCha8Rng,
}

impl PaperBroker {
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_account(AccountInfo::default(), seed)
    }

    pub fn with_account(account: AccountInfo, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { account, rng }
    }

    fn next_order_id(&mut self) -> String {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let suffix: String = (0..8)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        format!("paper-{}", suffix)
    }

    /// Fill price, or `None` for a limit that is not marketable
    fn fill_price(order: &OrderRequest, mark: f64) -> Option<f64> {
        match (order.order_type, order.limit_price) {
            (OrderType::Market, _) => Some(mark),
            (OrderType::Limit, Some(limit)) => {
                let marketable = match order.side {
                    OrderSide::Buy => limit >= mark,
                    OrderSide::Sell => limit <= mark,
                };
                marketable.then_some(limit)
            }
            (OrderType::Limit, None) => None,
        }
    }
}

impl Broker for PaperBroker {
    fn account(&self) -> DeskResult<AccountInfo> {
        Ok(self.account.clone())
    }

    fn submit(&mut self, order: &OrderRequest, mark: f64) -> DeskResult<OrderConfirmation> {
        order.validate()?;
        if !(mark.is_finite() && mark > 0.0) {
            return Err(DeskError::order(format!("no usable mark for {}", order.symbol)));
        }

        let check_price = order.limit_price.unwrap_or(mark).max(mark);
        let required = order.estimated_cost(check_price, EQUITY_CONTRACT_MULTIPLIER);
        if order.side == OrderSide::Buy && required > self.account.buying_power {
            warn!(
                "Rejecting {} x{}: needs {:.2}, buying power {:.2}",
                order.symbol, order.quantity, required, self.account.buying_power
            );
            return Err(DeskError::order(format!(
                "insufficient buying power: need {:.2}, have {:.2}",
                required, self.account.buying_power
            )));
        }

        let fill = Self::fill_price(order, mark);
        let (status, filled_quantity, message) = match fill {
            Some(price) => {
                let amount = order.estimated_cost(price, EQUITY_CONTRACT_MULTIPLIER);
                let signed = match order.side {
                    OrderSide::Buy => -amount,
                    OrderSide::Sell => amount,
                };
                self.account.cash += signed;
                self.account.buying_power += signed;
                (OrderStatus::Filled, order.quantity, "Simulated fill on paper account")
            }
            None => (OrderStatus::Accepted, 0, "Limit order resting on paper account"),
        };

        let confirmation = OrderConfirmation {
            id: self.next_order_id(),
            status,
            symbol: order.symbol.clone(),
            side: order.side,
            quantity: order.quantity,
            order_type: order.order_type,
            time_in_force: order.time_in_force,
            filled_quantity,
            filled_avg_price: fill,
            submitted_at: Utc::now(),
            message: message.to_string(),
        };

        info!(
            "Paper order {} {:?} {:?} {} x{} at {:?}",
            confirmation.id,
            confirmation.status,
            order.side,
            order.symbol,
            order.quantity,
            fill
        );
        Ok(confirmation)
    }
}
