//! Paired take-profit / stop-loss placement.
//!
//! Both legs are ordinary exchange orders. The exchange does not link
//! them, so when one fills the other keeps resting until the operator
//! cancels it.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::bracket::{BracketReport, LegOutcome};
use crate::domain::request::BracketParams;
use crate::domain::TimeInForce;
use crate::port::outbound::notifier::{BracketLeg, BracketLegEvent, Event};
use crate::port::{ExchangeGateway, Notifier};

/// Places the two closing legs of a position.
pub struct BracketPlacer {
    gateway: Arc<dyn ExchangeGateway>,
    notifier: Arc<dyn Notifier>,
}

impl BracketPlacer {
    pub fn new(gateway: Arc<dyn ExchangeGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self { gateway, notifier }
    }

    /// Place the take-profit limit, then the stop-triggered limit.
    ///
    /// The stop leg is skipped when the take-profit leg fails. When only the
    /// take-profit leg lands, [`BracketReport::orphaned_leg`] names it.
    pub async fn place(&self, params: &BracketParams) -> BracketReport {
        let symbol = &params.symbol;

        let snapshot_price = match self.gateway.current_price(symbol).await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Price snapshot unavailable for bracket");
                None
            }
        };

        let take_profit = match self
            .gateway
            .submit_resting(
                symbol,
                params.side,
                params.quantity,
                params.take_profit_price,
                TimeInForce::Gtc,
            )
            .await
        {
            Ok(ack) => LegOutcome::Placed {
                order_id: ack.order_id,
                status: ack.status,
            },
            Err(e) => LegOutcome::Failed {
                error: e.to_string(),
            },
        };
        self.report_leg(params, BracketLeg::TakeProfit, &take_profit);

        let stop_loss = if take_profit.is_placed() {
            match self
                .gateway
                .submit_stop_triggered(
                    symbol,
                    params.side,
                    params.quantity,
                    params.stop_price,
                    params.stop_limit_price,
                    TimeInForce::Gtc,
                )
                .await
            {
                Ok(ack) => LegOutcome::Placed {
                    order_id: ack.order_id,
                    status: ack.status,
                },
                Err(e) => LegOutcome::Failed {
                    error: e.to_string(),
                },
            }
        } else {
            LegOutcome::NotAttempted
        };
        self.report_leg(params, BracketLeg::StopLoss, &stop_loss);

        let report = BracketReport {
            symbol: symbol.clone(),
            side: params.side,
            quantity: params.quantity,
            take_profit_price: params.take_profit_price,
            stop_price: params.stop_price,
            stop_limit_price: params.stop_limit_price,
            take_profit,
            stop_loss,
            snapshot_price,
        };

        if let Some(order_id) = report.orphaned_leg() {
            warn!(
                symbol = %symbol,
                order_id = %order_id,
                "Stop leg failed; take-profit order is unprotected and must be handled manually"
            );
        } else if report.is_success() {
            info!(symbol = %symbol, "Both legs placed; they are not linked, cancel the survivor manually");
        }
        report
    }

    fn report_leg(&self, params: &BracketParams, leg: BracketLeg, outcome: &LegOutcome) {
        if let LegOutcome::Failed { error } = outcome {
            warn!(symbol = %params.symbol, leg = leg.as_str(), error = %error, "Bracket leg failed");
        }
        self.notifier.notify(Event::BracketLegCompleted(BracketLegEvent::new(
            &params.symbol,
            leg,
            outcome,
        )));
    }
}
