//! Take-profit / stop-loss placement against the scripted gateway.

use std::sync::Arc;

use rust_decimal_macros::dec;
use strata::application::BracketPlacer;
use strata::domain::bracket::LegOutcome;
use strata::domain::{OrderId, OrderSide, TimeInForce};
use strata::error::ExecutionError;
use strata::port::outbound::notifier::BracketLeg;
use strata::port::{Event, NullNotifier};
use strata::testkit::domain::sell_bracket;
use strata::testkit::{RecordingNotifier, ScriptedGateway, Submission};

fn placer(gateway: &Arc<ScriptedGateway>) -> BracketPlacer {
    BracketPlacer::new(gateway.clone(), Arc::new(NullNotifier))
}

#[tokio::test]
async fn places_take_profit_then_stop() {
    let gateway = Arc::new(ScriptedGateway::new(dec!(45000)));
    let params = sell_bracket(dec!(0.01), dec!(46000), dec!(44000));

    let report = placer(&gateway).place(&params).await;

    assert_eq!(
        gateway.submissions(),
        vec![
            Submission::Resting {
                symbol: params.symbol.clone(),
                side: OrderSide::Sell,
                quantity: dec!(0.01),
                price: dec!(46000),
                time_in_force: TimeInForce::Gtc,
            },
            Submission::StopTriggered {
                symbol: params.symbol.clone(),
                side: OrderSide::Sell,
                quantity: dec!(0.01),
                trigger_price: dec!(44000),
                limit_price: dec!(43999),
                time_in_force: TimeInForce::Gtc,
            },
        ]
    );
    assert!(report.is_success());
    assert_eq!(report.orphaned_leg(), None);
    assert_eq!(report.snapshot_price, Some(dec!(45000)));
    assert_eq!(report.potential_profit(), Some(dec!(10)));
    assert_eq!(report.potential_loss(), Some(dec!(10.01)));
    assert!(gateway.cancellations().is_empty());
}

#[tokio::test]
async fn failed_take_profit_skips_stop() {
    let gateway = Arc::new(ScriptedGateway::new(dec!(45000)));
    gateway.fail_submission(
        1,
        ExecutionError::Rejected {
            code: -2019,
            message: "Margin is insufficient.".into(),
        },
    );

    let report = placer(&gateway)
        .place(&sell_bracket(dec!(0.01), dec!(46000), dec!(44000)))
        .await;

    assert_eq!(gateway.submissions().len(), 1);
    assert!(matches!(report.take_profit, LegOutcome::Failed { ref error } if error.contains("Margin")));
    assert_eq!(report.stop_loss, LegOutcome::NotAttempted);
    assert_eq!(report.orphaned_leg(), None);
    assert!(!report.is_success());
}

#[tokio::test]
async fn failed_stop_leaves_take_profit_orphaned() {
    let gateway = Arc::new(ScriptedGateway::new(dec!(45000)));
    gateway.fail_submission(2, ExecutionError::Transport("connection reset".into()));

    let report = placer(&gateway)
        .place(&sell_bracket(dec!(0.01), dec!(46000), dec!(44000)))
        .await;

    assert_eq!(gateway.submissions().len(), 2);
    assert_eq!(report.orphaned_leg(), Some(&OrderId::from(1u64)));
    assert!(!report.is_success());
    // The survivor is reported, never cancelled on the operator's behalf.
    assert!(gateway.cancellations().is_empty());
}

#[tokio::test]
async fn missing_price_snapshot_still_places_both_legs() {
    let gateway = Arc::new(ScriptedGateway::new(dec!(45000)));
    gateway.fail_price(ExecutionError::Transport("timed out".into()));

    let report = placer(&gateway)
        .place(&sell_bracket(dec!(0.01), dec!(46000), dec!(44000)))
        .await;

    assert!(report.is_success());
    assert_eq!(report.snapshot_price, None);
    assert_eq!(report.risk_reward(), None);
}

#[tokio::test]
async fn notifier_sees_both_legs() {
    let gateway = Arc::new(ScriptedGateway::new(dec!(45000)));
    gateway.fail_submission(1, ExecutionError::Transport("connection reset".into()));
    let notifier = RecordingNotifier::new();

    BracketPlacer::new(gateway, Arc::new(notifier.clone()))
        .place(&sell_bracket(dec!(0.01), dec!(46000), dec!(44000)))
        .await;

    let legs: Vec<(BracketLeg, bool)> = notifier
        .events()
        .iter()
        .filter_map(|e| match e {
            Event::BracketLegCompleted(leg) => Some((leg.leg, leg.success)),
            _ => None,
        })
        .collect();
    assert_eq!(
        legs,
        vec![(BracketLeg::TakeProfit, false), (BracketLeg::StopLoss, false)]
    );
}
