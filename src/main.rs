use std::process::ExitCode;

use clap::Parser;
use strata::adapter::inbound::cli::command::{Cli, ColorChoice};
use strata::adapter::inbound::cli::context::Context;
use strata::adapter::inbound::cli::dispatch;
use strata::adapter::inbound::cli::output::{self, OutputConfig};
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    output::configure(OutputConfig::new(cli.json, cli.quiet));
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }

    let ctx = match Context::load(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            output::error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = ctx.config.logging.init(level_override(&cli)) {
        output::warning(&format!("logging disabled: {e}"));
    }
    debug!(config = %cli.config.display(), environment = %ctx.environment(), "strata starting");

    match dispatch::execute(&cli, &ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            if e.is_validation() {
                output::hint("run with --help to see the expected arguments");
            }
            ExitCode::FAILURE
        }
    }
}

fn level_override(cli: &Cli) -> Option<&'static str> {
    if cli.quiet {
        return Some("error");
    }
    match cli.verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}
