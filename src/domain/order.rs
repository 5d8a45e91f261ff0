//! Order vocabulary shared by every strategy.
//!
//! - [`OrderSide`] / [`TimeInForce`] - enumerations sent to the exchange
//! - [`ImmediateFill`] - typed outcome of an immediate-execution order
//! - [`OrderAck`] - typed acknowledgement of a resting or triggered order
//! - [`OrderState`] - an order as the exchange currently reports it

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, Symbol};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    /// Buy order.
    Buy,
    /// Sell order.
    Sell,
}

impl OrderSide {
    /// Wire representation used by the exchange.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }

    /// The side that closes a position opened with `self`.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(format!("{other} is not BUY or SELL")),
        }
    }
}

/// How long a resting order stays on the book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancelled.
    #[default]
    Gtc,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
}

impl TimeInForce {
    /// Wire representation used by the exchange.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gtc => "GTC",
            Self::Ioc => "IOC",
            Self::Fok => "FOK",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GTC" => Ok(Self::Gtc),
            "IOC" => Ok(Self::Ioc),
            "FOK" => Ok(Self::Fok),
            other => Err(format!("{other} is not one of GTC, IOC, FOK")),
        }
    }
}

/// Outcome of an immediate-execution (market) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImmediateFill {
    /// The order ID returned by the exchange.
    pub order_id: OrderId,
    /// Quantity the exchange reports as executed.
    pub executed_quantity: Decimal,
    /// Average fill price, when the exchange reports one.
    pub average_price: Option<Decimal>,
}

/// Acknowledgement of a resting, triggered or cancelled order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderAck {
    /// The order ID returned by the exchange.
    pub order_id: OrderId,
    /// Exchange order status (e.g. `NEW`, `FILLED`, `CANCELED`).
    pub status: String,
    /// Quantity executed so far.
    pub executed_quantity: Decimal,
    /// Average fill price, when anything has filled.
    pub average_price: Option<Decimal>,
}

/// Current state of an order on the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderState {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: OrderSide,
    /// Exchange order type (e.g. `LIMIT`, `STOP`, `MARKET`).
    pub order_type: String,
    pub status: String,
    /// Limit price; `None` for market orders.
    pub price: Option<Decimal>,
    /// Trigger price; `None` unless the order is stop-triggered.
    pub stop_price: Option<Decimal>,
    pub quantity: Decimal,
    pub executed_quantity: Decimal,
    pub average_price: Option<Decimal>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderState {
    /// Whether the exchange will not change this order any further.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(
            self.status.as_str(),
            "FILLED" | "CANCELED" | "EXPIRED" | "REJECTED"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!(" buy ".parse::<OrderSide>(), Ok(OrderSide::Buy));
        assert_eq!("Sell".parse::<OrderSide>(), Ok(OrderSide::Sell));
        assert!("hold".parse::<OrderSide>().is_err());
    }

    #[test]
    fn opposite_side_flips() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
    }

    #[test]
    fn time_in_force_round_trips_wire_names() {
        for tif in [TimeInForce::Gtc, TimeInForce::Ioc, TimeInForce::Fok] {
            assert_eq!(tif.as_str().parse::<TimeInForce>(), Ok(tif));
        }
        assert!("day".parse::<TimeInForce>().is_err());
    }

    #[test]
    fn terminal_statuses_are_final() {
        let mut state = OrderState {
            order_id: OrderId::from(7u64),
            symbol: Symbol::from("BTCUSDT"),
            side: OrderSide::Buy,
            order_type: "LIMIT".to_string(),
            status: "PARTIALLY_FILLED".to_string(),
            price: Some(Decimal::ONE),
            stop_price: None,
            quantity: Decimal::ONE,
            executed_quantity: Decimal::ZERO,
            average_price: None,
            updated_at: None,
        };
        assert!(!state.is_final());

        state.status = "CANCELED".to_string();
        assert!(state.is_final());
    }
}
