//! Handler for the `twap` command.

use std::sync::Arc;
use std::time::Duration;

use tabled::{Table, Tabled};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::command::TwapArgs;
use super::context::Context;
use super::output;
use crate::adapter::outbound::clock::TokioClock;
use crate::application::TwapExecutor;
use crate::domain::twap::ExecutionReport;
use crate::error::{Error, Result};

#[derive(Tabled)]
struct ChildRow {
    #[tabled(rename = "#")]
    index: u32,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Order ID")]
    order_id: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Execute the twap command.
///
/// Ctrl-C stops further child orders; the partial report is still printed.
pub async fn execute(ctx: &Context, args: &TwapArgs, assume_yes: bool) -> Result<()> {
    let params = ctx.validator.twap(
        &args.symbol,
        &args.side,
        args.total_quantity,
        args.num_orders,
        args.duration_minutes,
    )?;
    let plan = params.plan()?;

    output::section("TWAP");
    output::field("Symbol", &params.symbol);
    output::field("Side", output::side(params.side));
    output::field("Total", plan.total_quantity());
    output::field("Orders", plan.child_order_count());
    output::field("Per order", plan.quantity_per_child());
    output::field("Interval", format_duration(plan.interval()));
    output::field("Duration", format!("{} min", params.duration_minutes));
    output::field("Environment", ctx.environment());

    let executor = TwapExecutor::new(ctx.gateway()?, Arc::new(TokioClock), ctx.notifier());
    output::confirm(
        &format!(
            "{} {} {} in {} market orders?",
            params.side,
            plan.total_quantity(),
            params.symbol,
            plan.child_order_count()
        ),
        assume_yes,
    )?;

    let cancel = CancellationToken::new();
    let watcher = spawn_interrupt_watcher(cancel.clone());
    let report = executor.run_plan(&params, plan, &cancel).await;
    watcher.abort();

    print_report(&report)?;
    if report.is_success() {
        Ok(())
    } else {
        Err(Error::RunFailed {
            strategy: "TWAP",
            succeeded: report.succeeded(),
            attempted: report.attempted(),
        })
    }
}

/// Cancel `token` on the first Ctrl-C.
fn spawn_interrupt_watcher(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, stopping after the current order");
            token.cancel();
        }
    })
}

fn print_report(report: &ExecutionReport) -> Result<()> {
    if output::is_json() {
        let mut value = serde_json::to_value(report)?;
        if let Some(object) = value.as_object_mut() {
            object.insert(
                "summary".to_string(),
                serde_json::json!({
                    "attempted": report.attempted(),
                    "succeeded": report.succeeded(),
                    "failed": report.failed(),
                    "executed_quantity": report.executed_quantity(),
                    "completion_ratio": report.completion_ratio(),
                    "average_price": report.volume_weighted_average_price(),
                    "executed_notional": report.executed_notional(),
                    "success": report.is_success(),
                }),
            );
        }
        output::json_output(value);
        return Ok(());
    }

    output::section("Execution");
    let rows: Vec<ChildRow> = report
        .records
        .iter()
        .map(|record| ChildRow {
            index: record.sequence_index,
            time: record.submitted_at.format("%H:%M:%S").to_string(),
            order_id: record
                .order_id
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            quantity: record.executed_quantity.to_string(),
            price: record
                .average_price
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
            status: match &record.error {
                Some(error) => format!("failed: {error}"),
                None => "filled".to_string(),
            },
        })
        .collect();
    if !rows.is_empty() {
        output::lines(&Table::new(rows).to_string());
    }

    output::section("Summary");
    output::field(
        "Orders",
        format!("{}/{} filled", report.succeeded(), report.attempted()),
    );
    output::field(
        "Executed",
        format!("{} of {}", report.executed_quantity(), report.target_quantity()),
    );
    output::field(
        "Completion",
        format!("{}%", (report.completion_ratio() * rust_decimal::Decimal::ONE_HUNDRED).round_dp(2)),
    );
    output::field("VWAP", output::highlight(report.volume_weighted_average_price()));
    output::field("Notional", report.executed_notional().round_dp(2));
    output::field("Elapsed", format_duration(report.duration));

    if report.cancelled {
        output::warning(&format!(
            "run cancelled after {} of {} orders",
            report.attempted(),
            report.plan.child_order_count()
        ));
    }
    if report.failed() > 0 {
        output::warning(&format!("{} child orders failed", report.failed()));
    }
    if report.unfilled() > 0 {
        output::warning(&format!(
            "{} child orders were accepted but report nothing executed",
            report.unfilled()
        ));
    }
    if report.is_success() {
        output::success("TWAP complete");
    }
    Ok(())
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_render_in_minutes_once_long_enough() {
        assert_eq!(format_duration(Duration::from_secs(150)), "2m 30s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
    }
}
