//! Notifier port for progress and outcome events.
//!
//! Executors report through this trait instead of writing to a global
//! logger, so the CLI, logs and tests can each observe a run their own way.

use std::time::Duration;

use rust_decimal::Decimal;

use crate::domain::bracket::LegOutcome;
use crate::domain::grid::{GridRungOutcome, GridRungResult};
use crate::domain::report::{OrderKind, OrderReport};
use crate::domain::twap::{ExecutionReport, TwapExecutionRecord};
use crate::domain::{OrderSide, Symbol};

/// Events emitted while strategies run.
#[derive(Debug, Clone)]
pub enum Event {
    /// A TWAP run is about to submit its first child.
    TwapStarted(TwapStartEvent),
    /// One TWAP child order was submitted (success or failure).
    TwapChildCompleted(TwapChildEvent),
    /// A TWAP run ended, complete or cancelled.
    TwapFinished(TwapSummaryEvent),
    /// One grid rung was processed.
    GridRungCompleted(GridRungEvent),
    /// Grid placement ended.
    GridFinished(GridSummaryEvent),
    /// One leg of a take-profit / stop-loss pair was processed.
    BracketLegCompleted(BracketLegEvent),
    /// A standalone order was accepted by the exchange.
    OrderPlaced(OrderEvent),
}

/// TWAP start event.
#[derive(Debug, Clone)]
pub struct TwapStartEvent {
    pub symbol: Symbol,
    pub side: OrderSide,
    pub total_quantity: Decimal,
    pub child_order_count: u32,
    pub interval: Duration,
}

/// TWAP child order event.
#[derive(Debug, Clone)]
pub struct TwapChildEvent {
    pub symbol: Symbol,
    /// 1-based position of the child.
    pub sequence_index: u32,
    pub child_order_count: u32,
    pub success: bool,
    pub executed_quantity: Decimal,
    pub average_price: Option<Decimal>,
    /// Order ID on success, error message on failure.
    pub details: String,
}

impl TwapChildEvent {
    /// Build a child event from an appended execution record.
    #[must_use]
    pub fn from_record(symbol: &Symbol, child_order_count: u32, record: &TwapExecutionRecord) -> Self {
        let details = match (&record.order_id, &record.error) {
            (Some(order_id), _) => format!("order {order_id}"),
            (None, Some(error)) => error.clone(),
            (None, None) => String::new(),
        };
        Self {
            symbol: symbol.clone(),
            sequence_index: record.sequence_index,
            child_order_count,
            success: record.is_success(),
            executed_quantity: record.executed_quantity,
            average_price: record.average_price,
            details,
        }
    }
}

/// TWAP summary event.
#[derive(Debug, Clone)]
pub struct TwapSummaryEvent {
    pub symbol: Symbol,
    pub attempted: usize,
    pub succeeded: usize,
    pub executed_quantity: Decimal,
    pub average_price: Decimal,
    pub cancelled: bool,
}

impl From<&ExecutionReport> for TwapSummaryEvent {
    fn from(report: &ExecutionReport) -> Self {
        Self {
            symbol: report.symbol.clone(),
            attempted: report.attempted(),
            succeeded: report.succeeded(),
            executed_quantity: report.executed_quantity(),
            average_price: report.volume_weighted_average_price(),
            cancelled: report.cancelled,
        }
    }
}

/// Grid rung event.
#[derive(Debug, Clone)]
pub struct GridRungEvent {
    pub symbol: Symbol,
    pub level: u32,
    pub level_count: usize,
    pub price: Decimal,
    pub side: Option<OrderSide>,
    pub placed: bool,
    /// Order ID, error message or skip reason.
    pub details: String,
}

impl GridRungEvent {
    /// Build a rung event from a recorded rung result.
    #[must_use]
    pub fn from_result(symbol: &Symbol, level_count: usize, result: &GridRungResult) -> Self {
        let details = match &result.outcome {
            GridRungOutcome::Placed(record) => format!("order {}", record.order_id),
            GridRungOutcome::Failed { error, .. } => error.clone(),
            GridRungOutcome::SkippedAtPrice => "at market price".to_string(),
        };
        Self {
            symbol: symbol.clone(),
            level: result.level,
            level_count,
            price: result.price,
            side: result.side(),
            placed: result.is_placed(),
            details,
        }
    }
}

/// Grid summary event.
#[derive(Debug, Clone)]
pub struct GridSummaryEvent {
    pub symbol: Symbol,
    pub placed: usize,
    pub attempted: usize,
    pub skipped: usize,
}

/// Which leg of a take-profit / stop-loss pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketLeg {
    TakeProfit,
    StopLoss,
}

impl BracketLeg {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TakeProfit => "take-profit",
            Self::StopLoss => "stop-loss",
        }
    }
}

/// Bracket leg event.
#[derive(Debug, Clone)]
pub struct BracketLegEvent {
    pub symbol: Symbol,
    pub leg: BracketLeg,
    pub success: bool,
    pub details: String,
}

impl BracketLegEvent {
    #[must_use]
    pub fn new(symbol: &Symbol, leg: BracketLeg, outcome: &LegOutcome) -> Self {
        let details = match outcome {
            LegOutcome::Placed { order_id, status } => format!("order {order_id} ({status})"),
            LegOutcome::Failed { error } => error.clone(),
            LegOutcome::NotAttempted => "not attempted".to_string(),
        };
        Self {
            symbol: symbol.clone(),
            leg,
            success: outcome.is_placed(),
            details,
        }
    }
}

/// Standalone order event.
#[derive(Debug, Clone)]
pub struct OrderEvent {
    pub kind: OrderKind,
    pub symbol: Symbol,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub order_id: String,
    pub status: String,
}

impl From<&OrderReport> for OrderEvent {
    fn from(report: &OrderReport) -> Self {
        Self {
            kind: report.kind,
            symbol: report.symbol.clone(),
            side: report.side,
            quantity: report.quantity,
            order_id: report.ack.order_id.to_string(),
            status: report.ack.status.clone(),
        }
    }
}

/// Trait for notification handlers.
///
/// Implementations must be thread-safe and return quickly: executors call
/// `notify` inline between exchange requests.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }
}

/// A no-op notifier for tests or when reporting is disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{info, warn};
        match event {
            Event::TwapStarted(e) => {
                info!(
                    symbol = %e.symbol,
                    side = %e.side,
                    total = %e.total_quantity,
                    children = e.child_order_count,
                    interval_secs = e.interval.as_secs_f64(),
                    "TWAP started"
                );
            }
            Event::TwapChildCompleted(e) if e.success => {
                info!(
                    symbol = %e.symbol,
                    child = e.sequence_index,
                    of = e.child_order_count,
                    executed = %e.executed_quantity,
                    details = %e.details,
                    "TWAP child filled"
                );
            }
            Event::TwapChildCompleted(e) => {
                warn!(
                    symbol = %e.symbol,
                    child = e.sequence_index,
                    of = e.child_order_count,
                    error = %e.details,
                    "TWAP child failed"
                );
            }
            Event::TwapFinished(e) => {
                info!(
                    symbol = %e.symbol,
                    attempted = e.attempted,
                    succeeded = e.succeeded,
                    executed = %e.executed_quantity,
                    vwap = %e.average_price,
                    cancelled = e.cancelled,
                    "TWAP finished"
                );
            }
            Event::GridRungCompleted(e) => {
                info!(
                    symbol = %e.symbol,
                    level = e.level,
                    price = %e.price,
                    side = ?e.side,
                    placed = e.placed,
                    details = %e.details,
                    "Grid rung processed"
                );
            }
            Event::GridFinished(e) => {
                info!(
                    symbol = %e.symbol,
                    placed = e.placed,
                    attempted = e.attempted,
                    skipped = e.skipped,
                    "Grid setup finished"
                );
            }
            Event::BracketLegCompleted(e) => {
                info!(
                    symbol = %e.symbol,
                    leg = e.leg.as_str(),
                    success = e.success,
                    details = %e.details,
                    "Bracket leg processed"
                );
            }
            Event::OrderPlaced(e) => {
                info!(
                    kind = %e.kind,
                    symbol = %e.symbol,
                    side = %e.side,
                    quantity = %e.quantity,
                    order_id = %e.order_id,
                    status = %e.status,
                    "Order placed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicUsize>);

    impl Notifier for Counting {
        fn notify(&self, _event: Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn finished() -> Event {
        Event::GridFinished(GridSummaryEvent {
            symbol: Symbol::from("BTCUSDT"),
            placed: 1,
            attempted: 1,
            skipped: 0,
        })
    }

    #[test]
    fn registry_fans_out_to_every_notifier() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(Counting(count.clone())));
        registry.register(Box::new(Counting(count.clone())));
        registry.register(Box::new(NullNotifier));

        registry.notify(finished());

        assert_eq!(registry.len(), 3);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_child_event_carries_error_text() {
        let record = TwapExecutionRecord::failed(3, "insufficient margin", chrono::Utc::now());
        let event = TwapChildEvent::from_record(&Symbol::from("BTCUSDT"), 5, &record);
        assert!(!event.success);
        assert_eq!(event.details, "insufficient margin");
        assert_eq!(event.sequence_index, 3);
    }
}
