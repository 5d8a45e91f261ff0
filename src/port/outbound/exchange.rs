//! Exchange port for price queries and order submission.
//!
//! This is the only way executors reach the exchange. Adapters decode the
//! wire format once at this boundary; executors see typed outcomes or an
//! [`ExecutionError`](crate::error::ExecutionError) wrapped in
//! [`Error::Execution`](crate::error::Error::Execution).

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{
    AssetBalance, ImmediateFill, OrderAck, OrderId, OrderSide, OrderState, Symbol, TimeInForce,
};
use crate::error::Error;

/// Gateway to a derivatives exchange.
///
/// Every method is a single request with no automatic retry of order
/// submissions. Implementations must be thread-safe; executors share one
/// gateway through an `Arc`.
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// Latest traded price for `symbol`.
    async fn current_price(&self, symbol: &Symbol) -> Result<Decimal, Error>;

    /// Submit an order that executes immediately at market.
    async fn submit_immediate(
        &self,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<ImmediateFill, Error>;

    /// Submit a limit order that rests on the book at `price`.
    async fn submit_resting(
        &self,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        time_in_force: TimeInForce,
    ) -> Result<OrderAck, Error>;

    /// Submit a limit order at `limit_price` that activates once the market
    /// touches `trigger_price`.
    async fn submit_stop_triggered(
        &self,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Decimal,
        trigger_price: Decimal,
        limit_price: Decimal,
        time_in_force: TimeInForce,
    ) -> Result<OrderAck, Error>;

    /// Cancel an open order.
    async fn cancel(&self, symbol: &Symbol, order_id: &OrderId) -> Result<OrderAck, Error>;

    /// Look up an order by its exchange ID.
    async fn order_status(&self, symbol: &Symbol, order_id: &OrderId) -> Result<OrderState, Error>;

    /// Wallet balances for every asset on the account.
    async fn balances(&self) -> Result<Vec<AssetBalance>, Error>;

    /// Get the exchange name for logging/debugging.
    fn exchange_name(&self) -> &'static str;
}
