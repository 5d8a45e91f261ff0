//! Handler for the `oco` command.
//!
//! Both legs are placed as independent orders. The exchange does not link
//! them, so the output always tells the operator to cancel the survivor.

use super::command::OcoArgs;
use super::context::Context;
use super::output;
use crate::application::BracketPlacer;
use crate::domain::bracket::{BracketReport, LegOutcome};
use crate::error::{Error, Result};

const UNLINKED_NOTICE: &str =
    "legs are NOT linked: when one fills, cancel the other manually";

/// Execute the oco command.
pub async fn execute(ctx: &Context, args: &OcoArgs, assume_yes: bool) -> Result<()> {
    let params = ctx.validator.bracket(
        &args.symbol,
        &args.side,
        args.quantity,
        args.take_profit_price,
        args.stop_price,
        args.stop_limit_price,
    )?;

    output::section("Take-profit / stop-loss");
    output::field("Symbol", &params.symbol);
    output::field("Side", output::side(params.side));
    output::field("Quantity", params.quantity);
    output::field("Take profit", output::positive(params.take_profit_price));
    output::field("Stop", output::negative(params.stop_price));
    output::field("Stop limit", params.stop_limit_price);
    output::field("Environment", ctx.environment());
    output::warning(UNLINKED_NOTICE);

    let placer = BracketPlacer::new(ctx.gateway()?, ctx.notifier());
    output::confirm(
        &format!("Place both closing orders for {} {}?", params.quantity, params.symbol),
        assume_yes,
    )?;

    let report = placer.place(&params).await;
    print_report(&report)?;
    if report.is_success() {
        return Ok(());
    }
    let legs = [&report.take_profit, &report.stop_loss];
    Err(Error::RunFailed {
        strategy: "OCO",
        succeeded: legs.iter().filter(|leg| leg.is_placed()).count(),
        attempted: legs
            .iter()
            .filter(|leg| !matches!(leg, LegOutcome::NotAttempted))
            .count(),
    })
}

fn print_report(report: &BracketReport) -> Result<()> {
    if output::is_json() {
        let mut value = serde_json::to_value(report)?;
        if let Some(object) = value.as_object_mut() {
            object.insert(
                "summary".to_string(),
                serde_json::json!({
                    "linked": false,
                    "success": report.is_success(),
                    "orphaned_order_id": report.orphaned_leg(),
                    "potential_profit": report.potential_profit(),
                    "potential_loss": report.potential_loss(),
                    "risk_reward": report.risk_reward(),
                }),
            );
        }
        output::json_output(value);
        return Ok(());
    }

    output::section("Result");
    output::field("Take profit", describe(&report.take_profit));
    output::field("Stop loss", describe(&report.stop_loss));
    if let Some(market) = report.snapshot_price {
        output::field("Market", market);
    }
    if let Some(profit) = report.potential_profit() {
        output::field("Max profit", output::positive(profit.round_dp(2)));
    }
    if let Some(loss) = report.potential_loss() {
        output::field("Max loss", output::negative(loss.round_dp(2)));
    }
    if let Some(ratio) = report.risk_reward() {
        output::field("Reward/risk", format!("{}", ratio.round_dp(2)));
    }

    if let Some(order_id) = report.orphaned_leg() {
        output::warning(&format!(
            "stop-loss failed; take-profit order {order_id} is resting without protection"
        ));
        output::hint(&format!(
            "run {} to remove it",
            output::highlight(format!("strata cancel {} {order_id}", report.symbol))
        ));
    } else if report.is_success() {
        output::success("both legs placed");
        output::warning(UNLINKED_NOTICE);
    }
    Ok(())
}

fn describe(leg: &LegOutcome) -> String {
    match leg {
        LegOutcome::Placed { order_id, status } => {
            format!("{} ({status})", output::highlight(order_id))
        }
        LegOutcome::Failed { error } => output::negative(format!("failed: {error}")),
        LegOutcome::NotAttempted => output::muted("not attempted"),
    }
}
