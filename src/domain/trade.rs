//! Core mirroring domain types.
//!
//! Defines the business entities of one poll cycle: the direction of a
//! mirrored trade, the classified balance delta, and the transient trade
//! intent derived from it. All values here live for a single cycle; the
//! only state carried across cycles is the last-known balance owned by
//! the mirror engine.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sizer::SizedTrade;

/// Direction of a mirrored trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    /// Observed inflow — mirror by spending the base coin on tokens.
    Buy,
    /// Observed outflow — mirror by selling tokens for the base coin.
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Classified difference between two consecutive balance snapshots.
///
/// Carries the magnitude rather than a signed value so downstream code
/// never handles negative raw amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceDelta {
    /// Balances are identical; the cycle takes no action.
    Unchanged,
    /// Balance increased by the contained amount.
    Inflow(U256),
    /// Balance decreased by the contained amount.
    Outflow(U256),
}

impl BalanceDelta {
    /// Classify the change from `previous` to `current`.
    pub fn between(previous: U256, current: U256) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Equal => Self::Unchanged,
            std::cmp::Ordering::Greater => Self::Inflow(current - previous),
            std::cmp::Ordering::Less => Self::Outflow(previous - current),
        }
    }
}

/// A trade the engine intends to execute, derived from one balance delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeIntent {
    /// Internal intent ID, for correlating log lines.
    pub id: Uuid,
    /// Buy or sell.
    pub side: TradeSide,
    /// Execution amount in raw units, as the swap call expects it.
    pub amount: U256,
    /// The same amount in human-scale units, for messages.
    pub amount_decimal: rust_decimal::Decimal,
}

impl TradeIntent {
    /// Build an intent from a computed trade size.
    pub fn new(side: TradeSide, sized: &SizedTrade) -> Self {
        Self {
            id: Uuid::new_v4(),
            side,
            amount: sized.amount,
            amount_decimal: sized.amount_decimal,
        }
    }

    /// One-line description used for the activity notification.
    pub fn summary(&self) -> String {
        match self.side {
            TradeSide::Buy => format!("Mirroring BUY with {} ETH", self.amount_decimal),
            TradeSide::Sell => format!("Mirroring SELL of {} tokens", self.amount_decimal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_delta_unchanged() {
        let b = U256::from(1000u64);
        assert_eq!(BalanceDelta::between(b, b), BalanceDelta::Unchanged);
    }

    #[test]
    fn test_delta_inflow() {
        let delta = BalanceDelta::between(U256::from(1000u64), U256::from(1500u64));
        assert_eq!(delta, BalanceDelta::Inflow(U256::from(500u64)));
    }

    #[test]
    fn test_delta_outflow() {
        let delta = BalanceDelta::between(U256::from(1500u64), U256::from(1000u64));
        assert_eq!(delta, BalanceDelta::Outflow(U256::from(500u64)));
    }

    #[test]
    fn test_trade_side_display() {
        assert_eq!(format!("{}", TradeSide::Buy), "BUY");
        assert_eq!(format!("{}", TradeSide::Sell), "SELL");
    }

    #[test]
    fn test_intent_summary_wording() {
        let sized = SizedTrade {
            amount: U256::from(250_000_000_000_000_000u128),
            amount_decimal: dec!(0.25),
            proportion: dec!(5),
        };
        let buy = TradeIntent::new(TradeSide::Buy, &sized);
        assert_eq!(buy.summary(), "Mirroring BUY with 0.25 ETH");
        let sell = TradeIntent::new(TradeSide::Sell, &sized);
        assert_eq!(sell.summary(), "Mirroring SELL of 0.25 tokens");
    }
}
