//! Validated strategy requests.
//!
//! Every type here is produced by
//! [`Validator`](crate::application::validator::Validator) from raw user
//! input and is immutable afterwards. Executors trust these values and do
//! not re-check ranges.

use rust_decimal::Decimal;

use super::error::DomainError;
use super::id::Symbol;
use super::order::{OrderSide, TimeInForce};
use super::twap::TwapPlan;

/// Parameters for a TWAP run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwapParams {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub total_quantity: Decimal,
    pub child_order_count: u32,
    pub duration_minutes: u32,
}

impl TwapParams {
    /// The child-order schedule these parameters describe.
    pub fn plan(&self) -> Result<TwapPlan, DomainError> {
        TwapPlan::try_new(
            self.total_quantity,
            self.child_order_count,
            self.duration_minutes,
        )
    }
}

/// Parameters for a static grid setup.
///
/// There is no side: each rung derives its side from the market price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridParams {
    pub symbol: Symbol,
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
    pub level_count: u32,
    pub quantity_per_level: Decimal,
}

/// Parameters for a paired take-profit / stop-loss placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketParams {
    pub symbol: Symbol,
    /// Side of both closing legs (SELL closes a long, BUY closes a short).
    pub side: OrderSide,
    pub quantity: Decimal,
    pub take_profit_price: Decimal,
    pub stop_price: Decimal,
    pub stop_limit_price: Decimal,
}

/// Parameters for a single market order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketOrderParams {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Decimal,
}

/// Parameters for a single limit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitOrderParams {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub time_in_force: TimeInForce,
}

/// Parameters for a single stop-limit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopLimitParams {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub stop_price: Decimal,
    pub limit_price: Decimal,
    pub time_in_force: TimeInForce,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn twap_params_describe_their_plan() {
        let params = TwapParams {
            symbol: Symbol::from("BTCUSDT"),
            side: OrderSide::Buy,
            total_quantity: dec!(0.1),
            child_order_count: 5,
            duration_minutes: 10,
        };
        let plan = params.plan().unwrap();
        assert_eq!(plan.quantity_per_child(), dec!(0.02));
        assert_eq!(plan.interval(), Duration::from_secs(120));

        let single = TwapParams {
            child_order_count: 1,
            ..params
        };
        assert_eq!(single.plan(), Err(DomainError::TooFewChildren { count: 1 }));
    }
}
