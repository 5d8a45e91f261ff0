//! Grid planner.
//!
//! Lays a static ladder of resting limit orders across a price range: buys
//! below the market snapshot, sells above it. Placement is one-shot with
//! no fill monitoring, replacement or re-centering.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::grid::{
    GridLadder, GridOrderRecord, GridRungOutcome, GridRungResult, GridSetupReport,
};
use crate::domain::request::GridParams;
use crate::domain::TimeInForce;
use crate::error::{Error, ExecutionError, Result};
use crate::port::outbound::notifier::{Event, GridRungEvent, GridSummaryEvent};
use crate::port::{ExchangeGateway, Notifier};

/// Default distance under which a rung counts as "at market".
pub const DEFAULT_PRICE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 8);

/// Places grid ladders through an exchange gateway.
pub struct GridPlanner {
    gateway: Arc<dyn ExchangeGateway>,
    notifier: Arc<dyn Notifier>,
    price_tolerance: Decimal,
}

impl GridPlanner {
    pub fn new(gateway: Arc<dyn ExchangeGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            price_tolerance: DEFAULT_PRICE_TOLERANCE,
        }
    }

    /// Override the at-market tolerance.
    #[must_use]
    pub fn with_price_tolerance(mut self, tolerance: Decimal) -> Self {
        self.price_tolerance = tolerance.abs();
        self
    }

    /// Compute the ladder and place one resting order per rung.
    ///
    /// Fails before any submission when the market price cannot be read,
    /// since sides cannot be assigned without it. Individual rung failures
    /// are recorded in the report and never abort the setup.
    pub async fn setup(&self, params: &GridParams) -> Result<GridSetupReport> {
        let ladder = GridLadder::try_new(params.lower_bound, params.upper_bound, params.level_count)?;
        let symbol = &params.symbol;

        let snapshot_price = self.gateway.current_price(symbol).await.map_err(|e| {
            warn!(symbol = %symbol, error = %e, "Cannot read market price for grid setup");
            Error::Execution(ExecutionError::PriceUnavailable {
                symbol: symbol.to_string(),
            })
        })?;

        let out_of_range = !ladder.contains(snapshot_price);
        if out_of_range {
            warn!(
                symbol = %symbol,
                price = %snapshot_price,
                lower = %ladder.lower_bound(),
                upper = %ladder.upper_bound(),
                "Market price is outside the grid range; all rungs fall on one side"
            );
        }

        info!(
            symbol = %symbol,
            levels = ladder.level_count(),
            step = %ladder.step(),
            price = %snapshot_price,
            "Placing grid"
        );

        let level_count = ladder.level_count();
        let mut rungs = Vec::with_capacity(level_count);

        for (level, &price) in (1u32..).zip(ladder.prices()) {
            let outcome = match GridLadder::side_for(price, snapshot_price, self.price_tolerance) {
                None => GridRungOutcome::SkippedAtPrice,
                Some(side) => match self
                    .gateway
                    .submit_resting(symbol, side, params.quantity_per_level, price, TimeInForce::Gtc)
                    .await
                {
                    Ok(ack) => GridRungOutcome::Placed(GridOrderRecord {
                        level,
                        side,
                        price,
                        quantity: params.quantity_per_level,
                        order_id: ack.order_id,
                    }),
                    Err(e) => {
                        warn!(symbol = %symbol, level, price = %price, error = %e, "Grid rung failed");
                        GridRungOutcome::Failed {
                            side,
                            error: e.to_string(),
                        }
                    }
                },
            };

            let result = GridRungResult {
                level,
                price,
                outcome,
            };
            self.notifier.notify(Event::GridRungCompleted(GridRungEvent::from_result(
                symbol,
                level_count,
                &result,
            )));
            rungs.push(result);
        }

        let report = GridSetupReport {
            symbol: symbol.clone(),
            ladder,
            quantity_per_level: params.quantity_per_level,
            snapshot_price,
            out_of_range,
            rungs,
        };

        self.notifier.notify(Event::GridFinished(GridSummaryEvent {
            symbol: symbol.clone(),
            placed: report.placed(),
            attempted: report.attempted(),
            skipped: report.skipped(),
        }));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderSide, Symbol};
    use crate::port::NullNotifier;
    use crate::testkit::ScriptedGateway;
    use rust_decimal_macros::dec;

    fn params(lower: Decimal, upper: Decimal, levels: u32) -> GridParams {
        GridParams {
            symbol: Symbol::from("ETHUSDT"),
            lower_bound: lower,
            upper_bound: upper,
            level_count: levels,
            quantity_per_level: dec!(0.01),
        }
    }

    #[test]
    fn default_tolerance_is_one_hundred_millionth() {
        assert_eq!(DEFAULT_PRICE_TOLERANCE, dec!(0.00000001));
    }

    #[tokio::test]
    async fn rung_at_market_is_skipped() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(150)));
        let planner = GridPlanner::new(gateway.clone(), Arc::new(NullNotifier));

        let report = planner.setup(&params(dec!(100), dec!(200), 3)).await.unwrap();

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.placed(), 2);
        assert_eq!(gateway.submissions().len(), 2);
        assert_eq!(report.rungs[1].outcome, GridRungOutcome::SkippedAtPrice);
    }

    #[tokio::test]
    async fn price_outside_range_places_one_side_only() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(250)));
        let planner = GridPlanner::new(gateway, Arc::new(NullNotifier));

        let report = planner.setup(&params(dec!(100), dec!(200), 5)).await.unwrap();

        assert!(report.out_of_range);
        assert_eq!(report.buy_orders().len(), 5);
        assert!(report.sell_orders().is_empty());
        assert_eq!(report.attempted_on(OrderSide::Sell), 0);
    }

    #[tokio::test]
    async fn wider_tolerance_skips_near_rungs() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(150.4)));
        let planner =
            GridPlanner::new(gateway, Arc::new(NullNotifier)).with_price_tolerance(dec!(0.5));

        let report = planner.setup(&params(dec!(100), dec!(200), 3)).await.unwrap();

        assert_eq!(report.skipped(), 1);
    }
}
