//! Single-order report.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::Symbol;
use super::order::{OrderAck, OrderSide, TimeInForce};

/// Kind of standalone order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Market,
    Limit,
    StopLimit,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
            Self::StopLimit => "STOP-LIMIT",
        })
    }
}

/// Outcome of one standalone order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderReport {
    pub kind: OrderKind,
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Decimal,
    /// Limit price for limit and stop-limit orders.
    pub price: Option<Decimal>,
    /// Trigger price for stop-limit orders.
    pub stop_price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
    pub ack: OrderAck,
    /// Market price read before submission, if available.
    pub snapshot_price: Option<Decimal>,
}

impl OrderReport {
    /// Signed distance of `price` from the snapshot, in percent.
    #[must_use]
    pub fn distance_from_market(&self, price: Decimal) -> Option<Decimal> {
        let market = self.snapshot_price?;
        (price - market)
            .checked_div(market)
            .map(|ratio| (ratio * Decimal::ONE_HUNDRED).round_dp(2))
    }
}
