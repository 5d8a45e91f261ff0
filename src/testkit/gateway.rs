//! In-memory [`ExchangeGateway`] with scripted behaviour.
//!
//! Every submission is recorded in order, including the ones scripted to
//! fail. Successful immediate orders fill completely at the scripted price
//! unless the gateway is told to leave them unfilled.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{
    AssetBalance, ImmediateFill, OrderAck, OrderId, OrderSide, OrderState, Symbol, TimeInForce,
};
use crate::error::{Error, ExecutionError};
use crate::port::ExchangeGateway;

/// A submission received by [`ScriptedGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Immediate {
        symbol: Symbol,
        side: OrderSide,
        quantity: Decimal,
    },
    Resting {
        symbol: Symbol,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        time_in_force: TimeInForce,
    },
    StopTriggered {
        symbol: Symbol,
        side: OrderSide,
        quantity: Decimal,
        trigger_price: Decimal,
        limit_price: Decimal,
        time_in_force: TimeInForce,
    },
}

impl Submission {
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        match self {
            Self::Immediate { side, .. }
            | Self::Resting { side, .. }
            | Self::StopTriggered { side, .. } => *side,
        }
    }

    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        match self {
            Self::Immediate { symbol, .. }
            | Self::Resting { symbol, .. }
            | Self::StopTriggered { symbol, .. } => symbol,
        }
    }

    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        match self {
            Self::Immediate { quantity, .. }
            | Self::Resting { quantity, .. }
            | Self::StopTriggered { quantity, .. } => *quantity,
        }
    }

    /// Limit price, if the submission carries one.
    #[must_use]
    pub const fn price(&self) -> Option<Decimal> {
        match self {
            Self::Immediate { .. } => None,
            Self::Resting { price, .. } => Some(*price),
            Self::StopTriggered { limit_price, .. } => Some(*limit_price),
        }
    }
}

/// Scripted exchange gateway for tests.
pub struct ScriptedGateway {
    price: Mutex<Result<Decimal, ExecutionError>>,
    report_fill_prices: bool,
    fill_market_orders: bool,
    balances: Vec<AssetBalance>,
    failures: Mutex<HashMap<usize, ExecutionError>>,
    submissions: Mutex<Vec<Submission>>,
    placed: Mutex<HashMap<OrderId, Submission>>,
    cancellations: Mutex<Vec<OrderId>>,
    next_order_id: AtomicU64,
}

impl ScriptedGateway {
    /// Create a gateway quoting `price` for every symbol.
    pub fn new(price: Decimal) -> Self {
        Self {
            price: Mutex::new(Ok(price)),
            report_fill_prices: true,
            fill_market_orders: true,
            balances: Vec::new(),
            failures: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            placed: Mutex::new(HashMap::new()),
            cancellations: Mutex::new(Vec::new()),
            next_order_id: AtomicU64::new(1),
        }
    }

    /// Immediate fills omit their average price.
    #[must_use]
    pub fn without_fill_prices(mut self) -> Self {
        self.report_fill_prices = false;
        self
    }

    /// Immediate orders are accepted but report nothing executed.
    #[must_use]
    pub fn with_unfilled_market_orders(mut self) -> Self {
        self.fill_market_orders = false;
        self
    }

    /// Add a wallet balance reported by [`ExchangeGateway::balances`].
    #[must_use]
    pub fn with_balance(mut self, asset: &str, balance: Decimal, available: Decimal) -> Self {
        self.balances.push(AssetBalance {
            asset: asset.to_string(),
            balance,
            available,
            unrealized_pnl: Decimal::ZERO,
        });
        self
    }

    /// Make price queries fail with `error`.
    pub fn fail_price(&self, error: ExecutionError) {
        *self.price.lock() = Err(error);
    }

    /// Make the `ordinal`-th submission (1-based, across all order types)
    /// fail with `error`.
    pub fn fail_submission(&self, ordinal: usize, error: ExecutionError) {
        self.failures.lock().insert(ordinal, error);
    }

    /// Every submission received so far, in order.
    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().clone()
    }

    pub fn cancellations(&self) -> Vec<OrderId> {
        self.cancellations.lock().clone()
    }

    fn record(&self, submission: Submission) -> Result<OrderId, Error> {
        let ordinal = {
            let mut submissions = self.submissions.lock();
            submissions.push(submission.clone());
            submissions.len()
        };
        if let Some(error) = self.failures.lock().remove(&ordinal) {
            return Err(Error::Execution(error));
        }
        let order_id = OrderId::from(self.next_order_id.fetch_add(1, Ordering::SeqCst));
        self.placed.lock().insert(order_id.clone(), submission);
        Ok(order_id)
    }

    fn quoted(&self) -> Option<Decimal> {
        self.price.lock().as_ref().ok().copied()
    }
}

#[async_trait]
impl ExchangeGateway for ScriptedGateway {
    async fn current_price(&self, _symbol: &Symbol) -> Result<Decimal, Error> {
        self.price.lock().clone().map_err(Error::Execution)
    }

    async fn submit_immediate(
        &self,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<ImmediateFill, Error> {
        let order_id = self.record(Submission::Immediate {
            symbol: symbol.clone(),
            side,
            quantity,
        })?;
        if !self.fill_market_orders {
            return Ok(ImmediateFill {
                order_id,
                executed_quantity: Decimal::ZERO,
                average_price: None,
            });
        }
        Ok(ImmediateFill {
            order_id,
            executed_quantity: quantity,
            average_price: if self.report_fill_prices {
                self.quoted()
            } else {
                None
            },
        })
    }

    async fn submit_resting(
        &self,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        time_in_force: TimeInForce,
    ) -> Result<OrderAck, Error> {
        let order_id = self.record(Submission::Resting {
            symbol: symbol.clone(),
            side,
            quantity,
            price,
            time_in_force,
        })?;
        Ok(new_ack(order_id))
    }

    async fn submit_stop_triggered(
        &self,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Decimal,
        trigger_price: Decimal,
        limit_price: Decimal,
        time_in_force: TimeInForce,
    ) -> Result<OrderAck, Error> {
        let order_id = self.record(Submission::StopTriggered {
            symbol: symbol.clone(),
            side,
            quantity,
            trigger_price,
            limit_price,
            time_in_force,
        })?;
        Ok(new_ack(order_id))
    }

    async fn cancel(&self, _symbol: &Symbol, order_id: &OrderId) -> Result<OrderAck, Error> {
        self.cancellations.lock().push(order_id.clone());
        Ok(OrderAck {
            status: "CANCELED".to_string(),
            ..new_ack(order_id.clone())
        })
    }

    async fn order_status(&self, _symbol: &Symbol, order_id: &OrderId) -> Result<OrderState, Error> {
        let submission = self.placed.lock().get(order_id).cloned().ok_or_else(|| {
            Error::Execution(ExecutionError::Rejected {
                code: -2013,
                message: "Order does not exist.".to_string(),
            })
        })?;
        let cancelled = self.cancellations.lock().contains(order_id);

        let (order_type, status, stop_price) = match &submission {
            Submission::Immediate { .. } => ("MARKET", "FILLED", None),
            Submission::Resting { .. } => ("LIMIT", "NEW", None),
            Submission::StopTriggered { trigger_price, .. } => ("STOP", "NEW", Some(*trigger_price)),
        };
        let filled = status == "FILLED";
        Ok(OrderState {
            order_id: order_id.clone(),
            symbol: submission.symbol().clone(),
            side: submission.side(),
            order_type: order_type.to_string(),
            status: if cancelled { "CANCELED" } else { status }.to_string(),
            price: submission.price(),
            stop_price,
            quantity: submission.quantity(),
            executed_quantity: if filled { submission.quantity() } else { Decimal::ZERO },
            average_price: if filled { self.quoted() } else { None },
            updated_at: None,
        })
    }

    async fn balances(&self) -> Result<Vec<AssetBalance>, Error> {
        Ok(self.balances.clone())
    }

    fn exchange_name(&self) -> &'static str {
        "scripted"
    }
}

fn new_ack(order_id: OrderId) -> OrderAck {
    OrderAck {
        order_id,
        status: "NEW".to_string(),
        executed_quantity: Decimal::ZERO,
        average_price: None,
    }
}
