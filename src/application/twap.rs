//! TWAP executor.
//!
//! Splits a total quantity into equal child orders submitted at market,
//! one at a time, with a fixed wait between submissions. A failed child is
//! recorded and the run moves on; only cancellation stops it early.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::request::TwapParams;
use crate::domain::twap::{ExecutionReport, TwapExecutionRecord, TwapPlan};
use crate::error::Result;
use crate::port::outbound::notifier::{Event, TwapChildEvent, TwapStartEvent, TwapSummaryEvent};
use crate::port::{Clock, ExchangeGateway, Notifier};

/// Executes TWAP runs against an exchange gateway.
pub struct TwapExecutor {
    gateway: Arc<dyn ExchangeGateway>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl TwapExecutor {
    pub fn new(
        gateway: Arc<dyn ExchangeGateway>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            clock,
            notifier,
        }
    }

    /// Build the plan for `params` and run it. Errors only when the
    /// parameters cannot form a plan.
    pub async fn run(&self, params: &TwapParams, cancel: &CancellationToken) -> Result<ExecutionReport> {
        let plan = params.plan()?;
        Ok(self.run_plan(params, plan, cancel).await)
    }

    /// Run `plan` to completion or until `cancel` fires.
    ///
    /// Child failures never abort the run. The report always reflects the
    /// children submitted so far; check [`ExecutionReport::is_success`] for
    /// the overall outcome.
    pub async fn run_plan(
        &self,
        params: &TwapParams,
        plan: TwapPlan,
        cancel: &CancellationToken,
    ) -> ExecutionReport {
        let symbol = &params.symbol;

        let snapshot_price = match self.gateway.current_price(symbol).await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Price snapshot unavailable, notional will not be estimated");
                None
            }
        };

        self.notifier.notify(Event::TwapStarted(TwapStartEvent {
            symbol: symbol.clone(),
            side: params.side,
            total_quantity: plan.total_quantity(),
            child_order_count: plan.child_order_count(),
            interval: plan.interval(),
        }));

        let started_at = self.clock.now();
        let count = plan.child_order_count();
        let mut records = Vec::with_capacity(count as usize);
        let mut cancelled = false;

        for index in 1..=count {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let submitted_at = self.clock.now();
            let record = match self
                .gateway
                .submit_immediate(symbol, params.side, plan.quantity_per_child())
                .await
            {
                Ok(fill) => {
                    if fill.executed_quantity.is_zero() {
                        warn!(
                            symbol = %symbol,
                            child = index,
                            order_id = %fill.order_id,
                            "TWAP child accepted but reports nothing executed"
                        );
                    }
                    TwapExecutionRecord::filled(
                        index,
                        fill.order_id,
                        fill.executed_quantity,
                        fill.average_price.or(snapshot_price),
                        submitted_at,
                    )
                }
                Err(e) => {
                    warn!(symbol = %symbol, child = index, error = %e, "TWAP child order failed");
                    TwapExecutionRecord::failed(index, e.to_string(), submitted_at)
                }
            };

            self.notifier.notify(Event::TwapChildCompleted(TwapChildEvent::from_record(
                symbol, count, &record,
            )));
            records.push(record);

            if index < count {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        cancelled = true;
                        break;
                    }
                    () = self.clock.sleep(plan.interval()) => {}
                }
            }
        }

        if cancelled {
            info!(
                symbol = %symbol,
                submitted = records.len(),
                planned = count,
                "TWAP run cancelled"
            );
        }

        let duration = (self.clock.now() - started_at).to_std().unwrap_or_default();
        let report = ExecutionReport {
            symbol: symbol.clone(),
            side: params.side,
            plan,
            snapshot_price,
            records,
            started_at,
            duration,
            cancelled,
        };

        self.notifier
            .notify(Event::TwapFinished(TwapSummaryEvent::from(&report)));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Symbol;
    use crate::domain::OrderSide;
    use crate::error::ExecutionError;
    use crate::port::NullNotifier;
    use crate::testkit::{ScriptedGateway, VirtualClock};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn params(count: u32) -> TwapParams {
        TwapParams {
            symbol: Symbol::from("BTCUSDT"),
            side: OrderSide::Buy,
            total_quantity: dec!(1),
            child_order_count: count,
            duration_minutes: 10,
        }
    }

    #[tokio::test]
    async fn waits_between_children_but_not_after_last() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(100)));
        let clock = Arc::new(VirtualClock::new());
        let executor = TwapExecutor::new(gateway.clone(), clock.clone(), Arc::new(NullNotifier));

        let report = executor
            .run(&params(4), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.attempted(), 4);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(150); 3]);
        assert_eq!(report.duration, Duration::from_secs(450));
    }

    #[tokio::test]
    async fn missing_fill_price_falls_back_to_snapshot() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(250)).without_fill_prices());
        let executor = TwapExecutor::new(
            gateway,
            Arc::new(VirtualClock::new()),
            Arc::new(NullNotifier),
        );

        let report = executor
            .run(&params(2), &CancellationToken::new())
            .await
            .unwrap();

        assert!(report.records.iter().all(|r| r.average_price == Some(dec!(250))));
        assert_eq!(report.volume_weighted_average_price(), dec!(250));
    }

    #[tokio::test]
    async fn unavailable_snapshot_still_runs() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(100)).without_fill_prices());
        gateway.fail_price(ExecutionError::Transport("timeout".into()));
        let executor = TwapExecutor::new(
            gateway,
            Arc::new(VirtualClock::new()),
            Arc::new(NullNotifier),
        );

        let report = executor
            .run(&params(2), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.snapshot_price, None);
        assert_eq!(report.estimated_notional(), None);
        assert_eq!(report.volume_weighted_average_price(), dec!(0));
    }

    #[tokio::test]
    async fn run_plan_executes_the_given_schedule() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(100)));
        let clock = Arc::new(VirtualClock::new());
        let executor = TwapExecutor::new(gateway.clone(), clock.clone(), Arc::new(NullNotifier));
        let params = params(4);
        let plan = params.plan().unwrap();

        let report = executor
            .run_plan(&params, plan.clone(), &CancellationToken::new())
            .await;

        assert_eq!(report.plan, plan);
        assert_eq!(gateway.submissions().len(), 4);
        assert_eq!(clock.sleeps(), vec![plan.interval(); 3]);
    }

    #[tokio::test]
    async fn invalid_params_fail_before_any_request() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(100)));
        let executor = TwapExecutor::new(
            gateway.clone(),
            Arc::new(VirtualClock::new()),
            Arc::new(NullNotifier),
        );

        assert!(executor.run(&params(1), &CancellationToken::new()).await.is_err());
        assert!(gateway.submissions().is_empty());
    }

    #[tokio::test]
    async fn pre_cancelled_token_submits_nothing() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(100)));
        let executor = TwapExecutor::new(
            gateway.clone(),
            Arc::new(VirtualClock::new()),
            Arc::new(NullNotifier),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = executor.run(&params(3), &cancel).await.unwrap();

        assert!(report.cancelled);
        assert_eq!(report.attempted(), 0);
        assert!(!report.is_success());
        assert!(gateway.submissions().is_empty());
    }
}
