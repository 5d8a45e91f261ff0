//! TWAP planning and execution results.
//!
//! - [`TwapPlan`] - how a total quantity is sliced over time
//! - [`TwapExecutionRecord`] - one submitted child order
//! - [`ExecutionReport`] - aggregate outcome of a run
//!
//! # Examples
//!
//! ```
//! use strata::domain::twap::TwapPlan;
//! use rust_decimal_macros::dec;
//! use std::time::Duration;
//!
//! let plan = TwapPlan::try_new(dec!(1.0), 10, 60).unwrap();
//! assert_eq!(plan.quantity_per_child(), dec!(0.1));
//! assert_eq!(plan.interval(), Duration::from_secs(360));
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::DomainError;
use super::id::{OrderId, Symbol};
use super::order::OrderSide;

/// Derived schedule for a TWAP run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwapPlan {
    total_quantity: Decimal,
    child_order_count: u32,
    quantity_per_child: Decimal,
    interval: Duration,
}

impl TwapPlan {
    /// Build a plan splitting `total_quantity` into `child_order_count`
    /// equal slices spread over `duration_minutes`.
    pub fn try_new(
        total_quantity: Decimal,
        child_order_count: u32,
        duration_minutes: u32,
    ) -> Result<Self, DomainError> {
        if child_order_count < 2 {
            return Err(DomainError::TooFewChildren {
                count: child_order_count,
            });
        }
        if total_quantity <= Decimal::ZERO {
            return Err(DomainError::NonPositiveQuantity {
                quantity: total_quantity,
            });
        }

        let quantity_per_child = total_quantity / Decimal::from(child_order_count);
        let interval = Duration::from_secs(u64::from(duration_minutes) * 60) / child_order_count;

        Ok(Self {
            total_quantity,
            child_order_count,
            quantity_per_child,
            interval,
        })
    }

    #[must_use]
    pub const fn total_quantity(&self) -> Decimal {
        self.total_quantity
    }

    #[must_use]
    pub const fn child_order_count(&self) -> u32 {
        self.child_order_count
    }

    #[must_use]
    pub const fn quantity_per_child(&self) -> Decimal {
        self.quantity_per_child
    }

    /// Wait between consecutive child submissions.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

/// One submitted child order. Appended once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwapExecutionRecord {
    /// 1-based position of the child in the schedule.
    pub sequence_index: u32,
    /// Exchange order ID; `None` when the submission failed.
    pub order_id: Option<OrderId>,
    pub executed_quantity: Decimal,
    /// Fill price, falling back to the run's price snapshot.
    pub average_price: Option<Decimal>,
    pub submitted_at: DateTime<Utc>,
    /// Failure reason when the submission failed.
    pub error: Option<String>,
}

impl TwapExecutionRecord {
    /// Record a child order the exchange accepted.
    #[must_use]
    pub fn filled(
        sequence_index: u32,
        order_id: OrderId,
        executed_quantity: Decimal,
        average_price: Option<Decimal>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence_index,
            order_id: Some(order_id),
            executed_quantity,
            average_price,
            submitted_at,
            error: None,
        }
    }

    /// Record a child order that could not be placed.
    #[must_use]
    pub fn failed(sequence_index: u32, error: impl Into<String>, submitted_at: DateTime<Utc>) -> Self {
        Self {
            sequence_index,
            order_id: None,
            executed_quantity: Decimal::ZERO,
            average_price: None,
            submitted_at,
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.order_id.is_some()
    }

    /// Accepted by the exchange, yet nothing executed.
    #[must_use]
    pub fn is_unfilled(&self) -> bool {
        self.is_success() && self.executed_quantity.is_zero()
    }
}

/// Volume-weighted average price over `(quantity, price)` fills.
///
/// Fills without a price are ignored. Returns zero when nothing priced
/// has filled.
#[must_use]
pub fn volume_weighted_average_price<I>(fills: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, Option<Decimal>)>,
{
    let (notional, quantity) = fills
        .into_iter()
        .filter_map(|(quantity, price)| price.map(|p| (quantity * p, quantity)))
        .fold((Decimal::ZERO, Decimal::ZERO), |(n, q), (fill_n, fill_q)| {
            (n + fill_n, q + fill_q)
        });

    if quantity.is_zero() {
        Decimal::ZERO
    } else {
        notional / quantity
    }
}

/// Aggregate outcome of a TWAP run, complete or cut short.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub plan: TwapPlan,
    /// Price snapshot taken before the first child, if available.
    pub snapshot_price: Option<Decimal>,
    pub records: Vec<TwapExecutionRecord>,
    pub started_at: DateTime<Utc>,
    /// Wall-clock time from the first submission to the end of the run.
    pub duration: Duration,
    /// True when the operator interrupted the run before all children.
    pub cancelled: bool,
}

impl ExecutionReport {
    #[must_use]
    pub fn target_quantity(&self) -> Decimal {
        self.plan.total_quantity()
    }

    #[must_use]
    pub fn executed_quantity(&self) -> Decimal {
        self.records.iter().map(|r| r.executed_quantity).sum()
    }

    /// Share of the target quantity that executed (0..=1 for normal fills).
    #[must_use]
    pub fn completion_ratio(&self) -> Decimal {
        self.executed_quantity()
            .checked_div(self.target_quantity())
            .unwrap_or(Decimal::ZERO)
    }

    /// Child orders submitted, successful or not.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.is_success()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Accepted children that report zero executed quantity.
    #[must_use]
    pub fn unfilled(&self) -> usize {
        self.records.iter().filter(|r| r.is_unfilled()).count()
    }

    #[must_use]
    pub fn volume_weighted_average_price(&self) -> Decimal {
        volume_weighted_average_price(
            self.records
                .iter()
                .filter(|r| r.is_success())
                .map(|r| (r.executed_quantity, r.average_price)),
        )
    }

    /// Quote value of fills that carry a price.
    #[must_use]
    pub fn executed_notional(&self) -> Decimal {
        self.records
            .iter()
            .filter_map(|r| r.average_price.map(|p| p * r.executed_quantity))
            .sum()
    }

    /// Rough quote value of the whole target at the snapshot price.
    #[must_use]
    pub fn estimated_notional(&self) -> Option<Decimal> {
        self.snapshot_price.map(|p| p * self.target_quantity())
    }

    /// A run succeeds when at least one child order executed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.succeeded() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(index: u32, qty: Decimal, price: Option<Decimal>) -> TwapExecutionRecord {
        TwapExecutionRecord::filled(index, OrderId::from(u64::from(index)), qty, price, Utc::now())
    }

    fn report(records: Vec<TwapExecutionRecord>, plan: TwapPlan) -> ExecutionReport {
        ExecutionReport {
            symbol: Symbol::from("BTCUSDT"),
            side: OrderSide::Buy,
            plan,
            snapshot_price: Some(dec!(100)),
            records,
            started_at: Utc::now(),
            duration: Duration::ZERO,
            cancelled: false,
        }
    }

    #[test]
    fn plan_slices_multiply_back_to_total() {
        for (total, count) in [(dec!(1), 3), (dec!(0.5), 7), (dec!(12.345), 100), (dec!(2), 2)] {
            let plan = TwapPlan::try_new(total, count, 60).unwrap();
            let rebuilt = plan.quantity_per_child() * Decimal::from(count);
            assert!(
                (rebuilt - total).abs() < dec!(0.000000000001),
                "{total} / {count} rebuilt as {rebuilt}"
            );
        }
    }

    #[test]
    fn plan_interval_spreads_duration_evenly() {
        let plan = TwapPlan::try_new(dec!(1), 10, 60).unwrap();
        assert_eq!(plan.interval(), Duration::from_secs(360));

        let plan = TwapPlan::try_new(dec!(1), 7, 1).unwrap();
        assert!(Duration::from_secs(60) - plan.interval() * 7 < Duration::from_nanos(7));
    }

    #[test]
    fn plan_rejects_single_child() {
        assert_eq!(
            TwapPlan::try_new(dec!(1), 1, 10),
            Err(DomainError::TooFewChildren { count: 1 })
        );
    }

    #[test]
    fn vwap_weights_by_quantity() {
        let vwap = volume_weighted_average_price([
            (dec!(2), Some(dec!(100))),
            (dec!(3), Some(dec!(110))),
        ]);
        assert_eq!(vwap, dec!(106));
    }

    #[test]
    fn vwap_is_zero_without_fills() {
        assert_eq!(volume_weighted_average_price([]), Decimal::ZERO);
        assert_eq!(volume_weighted_average_price([(dec!(1), None)]), Decimal::ZERO);
    }

    #[test]
    fn report_aggregates_fills_and_failures() {
        let plan = TwapPlan::try_new(dec!(10), 5, 5).unwrap();
        let records = vec![
            record(1, dec!(2), Some(dec!(100))),
            record(2, dec!(3), Some(dec!(110))),
            TwapExecutionRecord::failed(3, "rejected", Utc::now()),
        ];
        let report = report(records, plan);

        assert_eq!(report.attempted(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.executed_quantity(), dec!(5));
        assert_eq!(report.completion_ratio(), dec!(0.5));
        assert_eq!(report.volume_weighted_average_price(), dec!(106));
        assert_eq!(report.executed_notional(), dec!(530));
        assert_eq!(report.estimated_notional(), Some(dec!(1000)));
        assert!(report.is_success());
    }

    #[test]
    fn report_with_only_failures_is_not_success() {
        let plan = TwapPlan::try_new(dec!(1), 2, 1).unwrap();
        let records = vec![
            TwapExecutionRecord::failed(1, "rejected", Utc::now()),
            TwapExecutionRecord::failed(2, "rejected", Utc::now()),
        ];
        let report = report(records, plan);

        assert!(!report.is_success());
        assert_eq!(report.volume_weighted_average_price(), Decimal::ZERO);
        assert_eq!(report.completion_ratio(), Decimal::ZERO);
    }

    #[test]
    fn accepted_child_without_execution_counts_as_unfilled() {
        let plan = TwapPlan::try_new(dec!(1), 2, 1).unwrap();
        let records = vec![
            record(1, dec!(0.5), Some(dec!(100))),
            record(2, Decimal::ZERO, None),
        ];
        let report = report(records, plan);

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.unfilled(), 1);
        assert!(!TwapExecutionRecord::failed(3, "rejected", Utc::now()).is_unfilled());
    }
}
