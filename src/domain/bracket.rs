//! Paired take-profit / stop-loss results.
//!
//! The two legs are independent exchange orders. Nothing links them: when
//! one fills, the other stays on the book until the operator cancels it.

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::{OrderId, Symbol};
use super::order::OrderSide;

/// Outcome of one leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LegOutcome {
    Placed { order_id: OrderId, status: String },
    Failed { error: String },
    /// Skipped because an earlier leg failed.
    NotAttempted,
}

impl LegOutcome {
    #[must_use]
    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            Self::Placed { order_id, .. } => Some(order_id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}

/// Result of placing both legs of a bracket.
#[derive(Debug, Clone, Serialize)]
pub struct BracketReport {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub take_profit_price: Decimal,
    pub stop_price: Decimal,
    pub stop_limit_price: Decimal,
    pub take_profit: LegOutcome,
    pub stop_loss: LegOutcome,
    /// Market price at placement time, if it could be read.
    pub snapshot_price: Option<Decimal>,
}

impl BracketReport {
    /// Both legs are resting on the exchange.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.take_profit.is_placed() && self.stop_loss.is_placed()
    }

    /// The take-profit order left unprotected when the stop leg failed.
    ///
    /// The caller must cancel it or add a stop manually.
    #[must_use]
    pub fn orphaned_leg(&self) -> Option<&OrderId> {
        if self.stop_loss.is_placed() {
            None
        } else {
            self.take_profit.order_id()
        }
    }

    /// Quote profit if the take-profit leg fills from the snapshot price.
    #[must_use]
    pub fn potential_profit(&self) -> Option<Decimal> {
        self.snapshot_price.map(|market| match self.side {
            OrderSide::Sell => (self.take_profit_price - market) * self.quantity,
            OrderSide::Buy => (market - self.take_profit_price) * self.quantity,
        })
    }

    /// Quote loss if the stop leg fills at its limit from the snapshot price.
    #[must_use]
    pub fn potential_loss(&self) -> Option<Decimal> {
        self.snapshot_price.map(|market| match self.side {
            OrderSide::Sell => (market - self.stop_limit_price) * self.quantity,
            OrderSide::Buy => (self.stop_limit_price - market) * self.quantity,
        })
    }

    /// Reward-to-risk multiple, when both sides are known and the loss is non-zero.
    #[must_use]
    pub fn risk_reward(&self) -> Option<Decimal> {
        let profit = self.potential_profit()?;
        let loss = self.potential_loss()?;
        profit.checked_div(loss).map(|ratio| ratio.abs())
    }
}
