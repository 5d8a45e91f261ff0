//! Terminal progress for running strategies.

use indicatif::ProgressBar;
use parking_lot::Mutex;

use super::output;
use crate::port::{Event, Notifier};

/// Renders strategy events as progress bars and status lines.
///
/// Final reports are printed by the command handlers; this notifier only
/// covers what happens while a run is in flight.
#[derive(Default)]
pub struct ConsoleNotifier {
    progress: Mutex<Option<ProgressBar>>,
}

impl ConsoleNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn start(&self, len: u64, prefix: &str) {
        let pb = output::progress(len, prefix);
        if let Some(previous) = self.progress.lock().replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn finish(&self) {
        if let Some(pb) = self.progress.lock().take() {
            pb.finish_and_clear();
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, event: Event) {
        match event {
            Event::TwapStarted(e) => {
                self.start(u64::from(e.child_order_count), "TWAP");
            }
            Event::TwapChildCompleted(e) => {
                let guard = self.progress.lock();
                let Some(pb) = guard.as_ref() else {
                    return;
                };
                if e.success {
                    pb.set_message(format!("last fill {} {}", e.executed_quantity, e.details));
                } else if !pb.is_hidden() {
                    pb.println(format!(
                        "  ⚠ child {}/{} failed: {}",
                        e.sequence_index, e.child_order_count, e.details
                    ));
                }
                pb.inc(1);
            }
            Event::TwapFinished(_) | Event::GridFinished(_) => self.finish(),
            Event::GridRungCompleted(e) => {
                if e.level == 1 {
                    self.start(e.level_count as u64, "Grid");
                }
                if let Some(pb) = self.progress.lock().as_ref() {
                    pb.set_message(format!("{} {}", e.price, e.details));
                    pb.inc(1);
                }
            }
            Event::BracketLegCompleted(e) => {
                let message = format!("{} {}", e.leg.as_str(), e.details);
                if e.success {
                    output::success(&message);
                } else {
                    output::warning(&message);
                }
            }
            Event::OrderPlaced(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bracket::LegOutcome;
    use crate::domain::{OrderSide, Symbol};
    use crate::port::outbound::notifier::{BracketLeg, BracketLegEvent, TwapStartEvent, TwapSummaryEvent};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn twap_progress_is_cleared_when_run_finishes() {
        let notifier = ConsoleNotifier::new();
        let symbol = Symbol::from("BTCUSDT");

        notifier.notify(Event::TwapStarted(TwapStartEvent {
            symbol: symbol.clone(),
            side: OrderSide::Buy,
            total_quantity: dec!(0.1),
            child_order_count: 5,
            interval: Duration::from_secs(60),
        }));
        assert!(notifier.progress.lock().is_some());

        notifier.notify(Event::TwapFinished(TwapSummaryEvent {
            symbol,
            attempted: 5,
            succeeded: 5,
            executed_quantity: dec!(0.1),
            average_price: dec!(40000),
            cancelled: false,
        }));
        assert!(notifier.progress.lock().is_none());
    }

    #[test]
    fn bracket_leg_without_progress_bar_is_handled() {
        let notifier = ConsoleNotifier::new();
        notifier.notify(Event::BracketLegCompleted(BracketLegEvent::new(
            &Symbol::from("BTCUSDT"),
            BracketLeg::StopLoss,
            &LegOutcome::NotAttempted,
        )));
        assert!(notifier.progress.lock().is_none());
    }
}
