//! Handlers for single-order commands: `market`, `limit`, `stop-limit`,
//! `price`, `cancel`, `status` and `balance`.

use std::sync::Arc;

use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use super::command::{
    BalanceArgs, CancelArgs, LimitArgs, MarketArgs, PriceArgs, StatusArgs, StopLimitArgs,
};
use super::context::Context;
use super::output;
use crate::application::order::triggers_immediately;
use crate::application::validator::limit_beyond_stop;
use crate::application::OrderService;
use crate::domain::report::OrderReport;
use crate::domain::{AssetBalance, OrderId};
use crate::error::Result;

/// Execute the market command.
pub async fn execute_market(ctx: &Context, args: &MarketArgs, assume_yes: bool) -> Result<()> {
    let params = ctx.validator.market(&args.symbol, &args.side, args.quantity)?;

    output::section("Market order");
    output::field("Symbol", &params.symbol);
    output::field("Side", output::side(params.side));
    output::field("Quantity", params.quantity);
    output::field("Environment", ctx.environment());
    let service = OrderService::new(ctx.gateway()?, ctx.notifier());
    output::confirm(
        &format!("{} {} {} at market?", params.side, params.quantity, params.symbol),
        assume_yes,
    )?;

    let report = service.market(&params).await?;
    print_report(&report)
}

/// Execute the limit command.
pub async fn execute_limit(ctx: &Context, args: &LimitArgs, assume_yes: bool) -> Result<()> {
    let params = ctx.validator.limit(
        &args.symbol,
        &args.side,
        args.quantity,
        args.price,
        &args.tif,
    )?;

    output::section("Limit order");
    output::field("Symbol", &params.symbol);
    output::field("Side", output::side(params.side));
    output::field("Quantity", params.quantity);
    output::field("Price", params.price);
    output::field("Time in force", params.time_in_force);
    output::field("Environment", ctx.environment());
    let service = OrderService::new(ctx.gateway()?, ctx.notifier());
    output::confirm(
        &format!(
            "{} {} {} at {}?",
            params.side, params.quantity, params.symbol, params.price
        ),
        assume_yes,
    )?;

    let report = service.limit(&params).await?;
    print_report(&report)
}

/// Execute the stop-limit command.
pub async fn execute_stop_limit(
    ctx: &Context,
    args: &StopLimitArgs,
    assume_yes: bool,
) -> Result<()> {
    let params = ctx.validator.stop_limit(
        &args.symbol,
        &args.side,
        args.quantity,
        args.stop_price,
        args.limit_price,
        &args.tif,
    )?;

    output::section("Stop-limit order");
    output::field("Symbol", &params.symbol);
    output::field("Side", output::side(params.side));
    output::field("Quantity", params.quantity);
    output::field("Stop", params.stop_price);
    output::field("Limit", params.limit_price);
    output::field("Time in force", params.time_in_force);
    output::field("Environment", ctx.environment());
    if limit_beyond_stop(params.side, params.stop_price, params.limit_price) {
        output::warning("limit price is beyond the stop; the order may not fill once triggered");
    }
    let service = OrderService::new(ctx.gateway()?, ctx.notifier());
    output::confirm(
        &format!(
            "{} {} {} when price reaches {}?",
            params.side, params.quantity, params.symbol, params.stop_price
        ),
        assume_yes,
    )?;

    let report = service.stop_limit(&params).await?;
    if let Some(market) = report.snapshot_price {
        if triggers_immediately(params.side, params.stop_price, market) {
            output::warning(&format!(
                "stop {} is already crossed at market {market}; the order may trigger immediately",
                params.stop_price
            ));
        }
    }
    print_report(&report)
}

/// Execute the price command.
pub async fn execute_price(ctx: &Context, args: &PriceArgs) -> Result<()> {
    let symbol = ctx.validator.symbol(&args.symbol)?;
    let service = OrderService::new(Arc::new(ctx.public_client()), ctx.notifier());
    let price = service.current_price(&symbol).await?;

    if output::is_json() {
        output::json_output(serde_json::json!({
            "symbol": symbol,
            "price": price,
        }));
        return Ok(());
    }
    output::field(symbol.as_str(), output::highlight(price));
    Ok(())
}

/// Execute the cancel command.
pub async fn execute_cancel(ctx: &Context, args: &CancelArgs, assume_yes: bool) -> Result<()> {
    let symbol = ctx.validator.symbol(&args.symbol)?;
    let order_id = OrderId::new(args.order_id.trim());

    let service = OrderService::new(ctx.gateway()?, ctx.notifier());
    output::confirm(&format!("Cancel order {order_id} on {symbol}?"), assume_yes)?;

    let ack = service.cancel(&symbol, &order_id).await?;

    if output::is_json() {
        output::json_output(serde_json::to_value(&ack)?);
        return Ok(());
    }
    output::success(&format!("Order {} {}", ack.order_id, ack.status.to_lowercase()));
    Ok(())
}

/// Execute the status command.
pub async fn execute_status(ctx: &Context, args: &StatusArgs) -> Result<()> {
    let symbol = ctx.validator.symbol(&args.symbol)?;
    let order_id = OrderId::new(args.order_id.trim());

    let service = OrderService::new(ctx.gateway()?, ctx.notifier());
    let state = service.order_status(&symbol, &order_id).await?;

    if output::is_json() {
        output::json_output(serde_json::to_value(&state)?);
        return Ok(());
    }
    output::section(&format!("Order {}", state.order_id));
    output::field("Symbol", &state.symbol);
    output::field("Side", output::side(state.side));
    output::field("Type", &state.order_type);
    output::field(
        "Status",
        if state.is_final() {
            output::muted(&state.status)
        } else {
            output::highlight(&state.status)
        },
    );
    if let Some(price) = state.price {
        output::field("Price", price);
    }
    if let Some(stop) = state.stop_price {
        output::field("Stop", stop);
    }
    output::field(
        "Executed",
        format!("{} of {}", state.executed_quantity, state.quantity),
    );
    if let Some(average) = state.average_price {
        output::field("Avg price", average);
    }
    if let Some(updated) = state.updated_at {
        output::field("Updated", updated.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    Ok(())
}

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Unrealized PnL")]
    unrealized_pnl: String,
}

impl From<&AssetBalance> for BalanceRow {
    fn from(balance: &AssetBalance) -> Self {
        Self {
            asset: balance.asset.clone(),
            balance: balance.balance.normalize().to_string(),
            available: balance.available.normalize().to_string(),
            unrealized_pnl: balance.unrealized_pnl.normalize().to_string(),
        }
    }
}

/// Execute the balance command.
pub async fn execute_balance(ctx: &Context, args: &BalanceArgs) -> Result<()> {
    let service = OrderService::new(ctx.gateway()?, ctx.notifier());
    let balances = service.balances(args.all).await?;

    if output::is_json() {
        output::json_output(serde_json::to_value(&balances)?);
        return Ok(());
    }
    output::section(&format!("Balances ({})", ctx.environment()));
    if balances.is_empty() {
        output::note("no assets with a balance; pass --all to list every asset");
        return Ok(());
    }
    let rows: Vec<BalanceRow> = balances.iter().map(BalanceRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

fn print_report(report: &OrderReport) -> Result<()> {
    if output::is_json() {
        output::json_output(serde_json::to_value(report)?);
        return Ok(());
    }

    output::success(&format!("{} order placed", report.kind));
    output::field("Order ID", output::highlight(&report.ack.order_id));
    output::field("Status", &report.ack.status);
    if report.ack.executed_quantity > Decimal::ZERO {
        output::field("Executed", report.ack.executed_quantity);
    }
    if let Some(average) = report.ack.average_price {
        output::field("Avg price", average);
    }
    if let Some(market) = report.snapshot_price {
        output::field("Market", market);
    }
    if let Some(distance) = report.price.and_then(|p| report.distance_from_market(p)) {
        output::field("From market", format!("{distance}%"));
    }
    Ok(())
}
