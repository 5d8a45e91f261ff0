//! Standalone order service.
//!
//! One gateway call per operation. Unlike the strategy executors, failures
//! here propagate to the caller. Order lookups and balance queries live
//! here too since they share the signed gateway.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::warn;

use crate::application::validator::limit_beyond_stop;
use crate::domain::report::{OrderKind, OrderReport};
use crate::domain::request::{LimitOrderParams, MarketOrderParams, StopLimitParams};
use crate::domain::{AssetBalance, OrderAck, OrderId, OrderSide, OrderState, Symbol};
use crate::error::Result;
use crate::port::outbound::notifier::{Event, OrderEvent};
use crate::port::{ExchangeGateway, Notifier};

/// Whether a stop order would trigger as soon as it reaches the book.
#[must_use]
pub fn triggers_immediately(side: OrderSide, stop_price: Decimal, market_price: Decimal) -> bool {
    match side {
        OrderSide::Buy => stop_price < market_price,
        OrderSide::Sell => stop_price > market_price,
    }
}

/// Submits single market, limit and stop-limit orders.
pub struct OrderService {
    gateway: Arc<dyn ExchangeGateway>,
    notifier: Arc<dyn Notifier>,
}

impl OrderService {
    pub fn new(gateway: Arc<dyn ExchangeGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self { gateway, notifier }
    }

    pub async fn current_price(&self, symbol: &Symbol) -> Result<Decimal> {
        self.gateway.current_price(symbol).await
    }

    pub async fn market(&self, params: &MarketOrderParams) -> Result<OrderReport> {
        let snapshot_price = self.snapshot(&params.symbol).await;
        let fill = self
            .gateway
            .submit_immediate(&params.symbol, params.side, params.quantity)
            .await?;

        let ack = OrderAck {
            order_id: fill.order_id,
            status: if fill.executed_quantity >= params.quantity {
                "FILLED".to_string()
            } else {
                "PARTIALLY_FILLED".to_string()
            },
            executed_quantity: fill.executed_quantity,
            average_price: fill.average_price,
        };
        Ok(self.finish(OrderReport {
            kind: OrderKind::Market,
            symbol: params.symbol.clone(),
            side: params.side,
            quantity: params.quantity,
            price: None,
            stop_price: None,
            time_in_force: None,
            ack,
            snapshot_price,
        }))
    }

    pub async fn limit(&self, params: &LimitOrderParams) -> Result<OrderReport> {
        let snapshot_price = self.snapshot(&params.symbol).await;
        let ack = self
            .gateway
            .submit_resting(
                &params.symbol,
                params.side,
                params.quantity,
                params.price,
                params.time_in_force,
            )
            .await?;

        Ok(self.finish(OrderReport {
            kind: OrderKind::Limit,
            symbol: params.symbol.clone(),
            side: params.side,
            quantity: params.quantity,
            price: Some(params.price),
            stop_price: None,
            time_in_force: Some(params.time_in_force),
            ack,
            snapshot_price,
        }))
    }

    /// Submit a stop-limit order, warning about triggers that would fire at
    /// once and limits that may never fill.
    pub async fn stop_limit(&self, params: &StopLimitParams) -> Result<OrderReport> {
        let snapshot_price = self.snapshot(&params.symbol).await;
        if let Some(market) = snapshot_price {
            if triggers_immediately(params.side, params.stop_price, market) {
                warn!(
                    symbol = %params.symbol,
                    side = %params.side,
                    stop = %params.stop_price,
                    market = %market,
                    "Stop price is already crossed; order may trigger immediately"
                );
            }
        }
        if limit_beyond_stop(params.side, params.stop_price, params.limit_price) {
            warn!(
                symbol = %params.symbol,
                stop = %params.stop_price,
                limit = %params.limit_price,
                "Limit price is beyond the trigger; order may not fill after triggering"
            );
        }

        let ack = self
            .gateway
            .submit_stop_triggered(
                &params.symbol,
                params.side,
                params.quantity,
                params.stop_price,
                params.limit_price,
                params.time_in_force,
            )
            .await?;

        Ok(self.finish(OrderReport {
            kind: OrderKind::StopLimit,
            symbol: params.symbol.clone(),
            side: params.side,
            quantity: params.quantity,
            price: Some(params.limit_price),
            stop_price: Some(params.stop_price),
            time_in_force: Some(params.time_in_force),
            ack,
            snapshot_price,
        }))
    }

    pub async fn cancel(&self, symbol: &Symbol, order_id: &OrderId) -> Result<OrderAck> {
        self.gateway.cancel(symbol, order_id).await
    }

    pub async fn order_status(&self, symbol: &Symbol, order_id: &OrderId) -> Result<OrderState> {
        self.gateway.order_status(symbol, order_id).await
    }

    /// Wallet balances, dropping assets whose amounts are all zero unless
    /// `include_empty` is set.
    pub async fn balances(&self, include_empty: bool) -> Result<Vec<AssetBalance>> {
        let mut balances = self.gateway.balances().await?;
        if !include_empty {
            balances.retain(|balance| !balance.is_empty());
        }
        Ok(balances)
    }

    async fn snapshot(&self, symbol: &Symbol) -> Option<Decimal> {
        match self.gateway.current_price(symbol).await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Price snapshot unavailable");
                None
            }
        }
    }

    fn finish(&self, report: OrderReport) -> OrderReport {
        self.notifier.notify(Event::OrderPlaced(OrderEvent::from(&report)));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeInForce;
    use crate::error::{Error, ExecutionError};
    use crate::port::NullNotifier;
    use crate::testkit::{ScriptedGateway, Submission};
    use rust_decimal_macros::dec;

    fn service(gateway: Arc<ScriptedGateway>) -> OrderService {
        OrderService::new(gateway, Arc::new(NullNotifier))
    }

    #[test]
    fn immediate_trigger_depends_on_side() {
        assert!(triggers_immediately(OrderSide::Buy, dec!(99), dec!(100)));
        assert!(!triggers_immediately(OrderSide::Buy, dec!(101), dec!(100)));
        assert!(triggers_immediately(OrderSide::Sell, dec!(101), dec!(100)));
        assert!(!triggers_immediately(OrderSide::Sell, dec!(99), dec!(100)));
    }

    #[tokio::test]
    async fn market_order_reports_fill() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(3000)));
        let report = service(gateway.clone())
            .market(&MarketOrderParams {
                symbol: Symbol::from("ETHUSDT"),
                side: OrderSide::Sell,
                quantity: dec!(0.5),
            })
            .await
            .unwrap();

        assert_eq!(report.kind, OrderKind::Market);
        assert_eq!(report.ack.status, "FILLED");
        assert_eq!(report.ack.average_price, Some(dec!(3000)));
        assert_eq!(gateway.submissions().len(), 1);
    }

    #[tokio::test]
    async fn stop_limit_submits_trigger_and_limit() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(3000)));
        service(gateway.clone())
            .stop_limit(&StopLimitParams {
                symbol: Symbol::from("ETHUSDT"),
                side: OrderSide::Buy,
                quantity: dec!(0.1),
                stop_price: dec!(3100),
                limit_price: dec!(3110),
                time_in_force: TimeInForce::Gtc,
            })
            .await
            .unwrap();

        assert!(matches!(
            gateway.submissions()[0],
            Submission::StopTriggered { trigger_price, limit_price, .. }
                if trigger_price == dec!(3100) && limit_price == dec!(3110)
        ));
    }

    #[tokio::test]
    async fn rejected_limit_order_propagates() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(3000)));
        gateway.fail_submission(
            1,
            ExecutionError::Rejected {
                code: -2019,
                message: "Margin is insufficient.".into(),
            },
        );

        let err = service(gateway)
            .limit(&LimitOrderParams {
                symbol: Symbol::from("ETHUSDT"),
                side: OrderSide::Buy,
                quantity: dec!(1),
                price: dec!(2900),
                time_in_force: TimeInForce::Gtc,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Execution(ExecutionError::Rejected { code: -2019, .. })
        ));
    }

    #[tokio::test]
    async fn price_query_surfaces_gateway_failure() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(3000)));
        let service = service(gateway.clone());
        assert_eq!(service.current_price(&Symbol::from("ETHUSDT")).await.unwrap(), dec!(3000));

        gateway.fail_price(ExecutionError::Transport("timed out".into()));
        assert!(service.current_price(&Symbol::from("ETHUSDT")).await.is_err());
    }

    #[tokio::test]
    async fn cancel_passes_through_to_gateway() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(3000)));
        let ack = service(gateway.clone())
            .cancel(&Symbol::from("ETHUSDT"), &OrderId::from("42"))
            .await
            .unwrap();

        assert_eq!(ack.status, "CANCELED");
        assert_eq!(gateway.cancellations(), vec![OrderId::from("42")]);
        assert!(gateway.submissions().is_empty());
    }

    #[tokio::test]
    async fn status_reflects_placement_and_cancellation() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(3000)));
        let service = service(gateway.clone());
        let symbol = Symbol::from("ETHUSDT");
        let report = service
            .limit(&LimitOrderParams {
                symbol: symbol.clone(),
                side: OrderSide::Buy,
                quantity: dec!(1),
                price: dec!(2900),
                time_in_force: TimeInForce::Gtc,
            })
            .await
            .unwrap();

        let state = service.order_status(&symbol, &report.ack.order_id).await.unwrap();
        assert_eq!(state.order_type, "LIMIT");
        assert_eq!(state.status, "NEW");
        assert_eq!(state.price, Some(dec!(2900)));
        assert!(!state.is_final());

        service.cancel(&symbol, &report.ack.order_id).await.unwrap();
        let state = service.order_status(&symbol, &report.ack.order_id).await.unwrap();
        assert!(state.is_final());
    }

    #[tokio::test]
    async fn status_of_unknown_order_is_an_error() {
        let gateway = Arc::new(ScriptedGateway::new(dec!(3000)));
        let err = service(gateway)
            .order_status(&Symbol::from("ETHUSDT"), &OrderId::from("999"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Execution(ExecutionError::Rejected { code: -2013, .. })
        ));
    }

    #[tokio::test]
    async fn empty_balances_are_hidden_by_default() {
        let gateway = Arc::new(
            ScriptedGateway::new(dec!(3000))
                .with_balance("USDT", dec!(1500.25), dec!(1200))
                .with_balance("BNB", Decimal::ZERO, Decimal::ZERO),
        );
        let service = service(gateway);

        let shown = service.balances(false).await.unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].asset, "USDT");
        assert_eq!(shown[0].available, dec!(1200));

        assert_eq!(service.balances(true).await.unwrap().len(), 2);
    }
}
