//! Route a parsed command line to its handler.

use super::command::{Cli, Commands, ConfigCommand};
use super::context::Context;
use super::{bracket, check, config, grid, order, twap};
use crate::error::Result;

/// Run the selected subcommand.
pub async fn execute(cli: &Cli, ctx: &Context) -> Result<()> {
    let yes = cli.yes;
    match &cli.command {
        Commands::Market(args) => order::execute_market(ctx, args, yes).await,
        Commands::Limit(args) => order::execute_limit(ctx, args, yes).await,
        Commands::StopLimit(args) => order::execute_stop_limit(ctx, args, yes).await,
        Commands::Oco(args) => bracket::execute(ctx, args, yes).await,
        Commands::Twap(args) => twap::execute(ctx, args, yes).await,
        Commands::Grid(args) => grid::execute(ctx, args, yes).await,
        Commands::Price(args) => order::execute_price(ctx, args).await,
        Commands::Cancel(args) => order::execute_cancel(ctx, args, yes).await,
        Commands::Status(args) => order::execute_status(ctx, args).await,
        Commands::Balance(args) => order::execute_balance(ctx, args).await,
        Commands::Check => check::execute(ctx).await,
        Commands::Config(ConfigCommand::Show) => config::execute_show(cli, ctx),
    }
}
