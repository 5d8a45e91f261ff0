//! Handler for the `grid` command.

use tabled::{Table, Tabled};

use super::command::GridArgs;
use super::context::Context;
use super::output;
use crate::application::GridPlanner;
use crate::domain::grid::{GridLadder, GridRungOutcome, GridSetupReport};
use crate::domain::OrderSide;
use crate::error::{Error, Result};

#[derive(Tabled)]
struct RungRow {
    #[tabled(rename = "Level")]
    level: u32,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Side")]
    side: String,
    #[tabled(rename = "Order ID")]
    order_id: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Execute the grid command.
pub async fn execute(ctx: &Context, args: &GridArgs, assume_yes: bool) -> Result<()> {
    let params = ctx.validator.grid(
        &args.symbol,
        args.lower_price,
        args.upper_price,
        args.grid_levels,
        args.quantity_per_level,
    )?;
    let ladder = GridLadder::try_new(params.lower_bound, params.upper_bound, params.level_count)?;

    output::section("Grid");
    output::field("Symbol", &params.symbol);
    output::field(
        "Range",
        format!("{} - {}", ladder.lower_bound(), ladder.upper_bound()),
    );
    output::field("Levels", ladder.level_count());
    output::field("Step", ladder.step().round_dp(8));
    output::field("Per level", params.quantity_per_level);
    output::field("Environment", ctx.environment());
    output::note("rungs below the market become BUY orders, rungs above become SELL orders");

    let planner = GridPlanner::new(ctx.gateway()?, ctx.notifier())
        .with_price_tolerance(ctx.config.grid.price_tolerance);
    output::confirm(
        &format!(
            "Place up to {} limit orders on {}?",
            ladder.level_count(),
            params.symbol
        ),
        assume_yes,
    )?;

    let report = planner.setup(&params).await?;
    print_report(&report)?;
    if report.is_success() {
        Ok(())
    } else {
        Err(Error::RunFailed {
            strategy: "grid",
            succeeded: report.placed(),
            attempted: report.attempted(),
        })
    }
}

fn print_report(report: &GridSetupReport) -> Result<()> {
    if output::is_json() {
        let mut value = serde_json::to_value(report)?;
        if let Some(object) = value.as_object_mut() {
            object.insert(
                "summary".to_string(),
                serde_json::json!({
                    "buy_orders": report.buy_orders().len(),
                    "sell_orders": report.sell_orders().len(),
                    "attempted": report.attempted(),
                    "placed": report.placed(),
                    "skipped": report.skipped(),
                    "committed_buy_notional": report.committed_buy_notional(),
                    "success": report.is_success(),
                }),
            );
        }
        output::json_output(value);
        return Ok(());
    }

    output::section("Ladder");
    output::field("Market", output::highlight(report.snapshot_price));
    if report.out_of_range {
        output::warning("market price is outside the grid range; every order sits on one side");
    }

    let rows: Vec<RungRow> = report
        .rungs
        .iter()
        .rev()
        .map(|rung| {
            let (order_id, status) = match &rung.outcome {
                GridRungOutcome::Placed(record) => (record.order_id.to_string(), "placed".to_string()),
                GridRungOutcome::Failed { error, .. } => ("-".to_string(), format!("failed: {error}")),
                GridRungOutcome::SkippedAtPrice => ("-".to_string(), "skipped (at market)".to_string()),
            };
            RungRow {
                level: rung.level,
                price: rung.price.round_dp(8).to_string(),
                side: rung.side().map_or_else(|| "-".to_string(), output::side),
                order_id,
                status,
            }
        })
        .collect();
    output::lines(&Table::new(rows).to_string());

    output::section("Summary");
    output::field(
        "Buy orders",
        format!(
            "{}/{}",
            report.buy_orders().len(),
            report.attempted_on(OrderSide::Buy)
        ),
    );
    output::field(
        "Sell orders",
        format!(
            "{}/{}",
            report.sell_orders().len(),
            report.attempted_on(OrderSide::Sell)
        ),
    );
    if report.skipped() > 0 {
        output::field("Skipped", report.skipped());
    }
    output::field("Buy notional", report.committed_buy_notional().round_dp(2));

    let failed = report.attempted() - report.placed();
    if failed > 0 {
        output::warning(&format!("{failed} rung orders failed"));
    }
    if report.is_success() {
        output::success(&format!("{} grid orders resting", report.placed()));
        output::hint("orders are static: filled rungs are not replaced");
    }
    Ok(())
}
