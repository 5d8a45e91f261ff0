//! Grid ladder geometry and setup results.
//!
//! A grid is a static ladder of resting orders: rungs below the market
//! price become buys, rungs above become sells. Placement is one-shot;
//! nothing here tracks fills or replaces rungs.
//!
//! # Examples
//!
//! ```
//! use strata::domain::grid::GridLadder;
//! use rust_decimal_macros::dec;
//!
//! let ladder = GridLadder::try_new(dec!(100), dec!(200), 5).unwrap();
//! assert_eq!(ladder.step(), dec!(25));
//! assert_eq!(ladder.prices(), &[dec!(100), dec!(125), dec!(150), dec!(175), dec!(200)]);
//! ```

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::DomainError;
use super::id::{OrderId, Symbol};
use super::order::OrderSide;

/// Evenly spaced price ladder between two bounds. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridLadder {
    lower_bound: Decimal,
    upper_bound: Decimal,
    step: Decimal,
    prices: Vec<Decimal>,
}

impl GridLadder {
    /// Build a ladder of `level_count` prices from `lower_bound` to
    /// `upper_bound` inclusive.
    ///
    /// Each rung is computed from the bounds directly rather than by
    /// accumulating the step, so both endpoints are exact.
    pub fn try_new(
        lower_bound: Decimal,
        upper_bound: Decimal,
        level_count: u32,
    ) -> Result<Self, DomainError> {
        if lower_bound >= upper_bound {
            return Err(DomainError::InvertedRange {
                lower: lower_bound,
                upper: upper_bound,
            });
        }
        if level_count < 2 {
            return Err(DomainError::TooFewLevels { count: level_count });
        }

        let span = upper_bound - lower_bound;
        let intervals = Decimal::from(level_count - 1);
        let step = span / intervals;
        let prices = (0..level_count)
            .map(|i| lower_bound + span * Decimal::from(i) / intervals)
            .collect();

        Ok(Self {
            lower_bound,
            upper_bound,
            step,
            prices,
        })
    }

    #[must_use]
    pub const fn lower_bound(&self) -> Decimal {
        self.lower_bound
    }

    #[must_use]
    pub const fn upper_bound(&self) -> Decimal {
        self.upper_bound
    }

    /// Distance between adjacent rungs.
    #[must_use]
    pub const fn step(&self) -> Decimal {
        self.step
    }

    #[must_use]
    pub fn level_count(&self) -> usize {
        self.prices.len()
    }

    /// Rung prices in ascending order.
    #[must_use]
    pub fn prices(&self) -> &[Decimal] {
        &self.prices
    }

    /// Whether `price` lies within the ladder bounds (inclusive).
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        (self.lower_bound..=self.upper_bound).contains(&price)
    }

    /// Side for a rung relative to a market snapshot.
    ///
    /// Returns `None` when the rung sits at the market price (within
    /// `tolerance`); no order is placed there.
    #[must_use]
    pub fn side_for(rung_price: Decimal, market_price: Decimal, tolerance: Decimal) -> Option<OrderSide> {
        if (rung_price - market_price).abs() <= tolerance {
            None
        } else if rung_price < market_price {
            Some(OrderSide::Buy)
        } else {
            Some(OrderSide::Sell)
        }
    }
}

/// A resting order placed on one rung.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridOrderRecord {
    /// 1-based rung index.
    pub level: u32,
    pub side: OrderSide,
    pub price: Decimal,
    pub quantity: Decimal,
    pub order_id: OrderId,
}

/// What happened at one rung.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GridRungOutcome {
    /// A resting order was accepted by the exchange.
    Placed(GridOrderRecord),
    /// The submission failed; later rungs were still attempted.
    Failed { side: OrderSide, error: String },
    /// The rung matched the market price, so no order was sent.
    SkippedAtPrice,
}

/// Per-rung entry of a setup report, in ascending ladder order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRungResult {
    pub level: u32,
    pub price: Decimal,
    pub outcome: GridRungOutcome,
}

impl GridRungResult {
    /// Side the rung was assigned, if any order was attempted.
    #[must_use]
    pub fn side(&self) -> Option<OrderSide> {
        match &self.outcome {
            GridRungOutcome::Placed(record) => Some(record.side),
            GridRungOutcome::Failed { side, .. } => Some(*side),
            GridRungOutcome::SkippedAtPrice => None,
        }
    }

    #[must_use]
    pub const fn is_placed(&self) -> bool {
        matches!(self.outcome, GridRungOutcome::Placed(_))
    }
}

/// Outcome of a one-shot grid placement.
#[derive(Debug, Clone, Serialize)]
pub struct GridSetupReport {
    pub symbol: Symbol,
    pub ladder: GridLadder,
    pub quantity_per_level: Decimal,
    /// Market price used to assign sides, taken once before placement.
    pub snapshot_price: Decimal,
    /// True when the snapshot fell outside the ladder bounds.
    pub out_of_range: bool,
    pub rungs: Vec<GridRungResult>,
}

impl GridSetupReport {
    /// Placed buy orders in ascending price order.
    #[must_use]
    pub fn buy_orders(&self) -> Vec<&GridOrderRecord> {
        self.placed_on(OrderSide::Buy)
    }

    /// Placed sell orders in ascending price order.
    #[must_use]
    pub fn sell_orders(&self) -> Vec<&GridOrderRecord> {
        self.placed_on(OrderSide::Sell)
    }

    fn placed_on(&self, side: OrderSide) -> Vec<&GridOrderRecord> {
        self.rungs
            .iter()
            .filter_map(|rung| match &rung.outcome {
                GridRungOutcome::Placed(record) if record.side == side => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Orders attempted on `side`, placed or failed.
    #[must_use]
    pub fn attempted_on(&self, side: OrderSide) -> usize {
        self.rungs.iter().filter(|r| r.side() == Some(side)).count()
    }

    #[must_use]
    pub fn attempted(&self) -> usize {
        self.rungs.iter().filter(|r| r.side().is_some()).count()
    }

    #[must_use]
    pub fn placed(&self) -> usize {
        self.rungs.iter().filter(|r| r.is_placed()).count()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.rungs
            .iter()
            .filter(|r| r.outcome == GridRungOutcome::SkippedAtPrice)
            .count()
    }

    /// Setup succeeds when at least one order, buy or sell, was placed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.placed() > 0
    }

    /// Quote capital locked by the placed buy orders.
    #[must_use]
    pub fn committed_buy_notional(&self) -> Decimal {
        self.buy_orders().iter().map(|o| o.price * o.quantity).sum()
    }
}
