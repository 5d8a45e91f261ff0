//! Handler for `config show`.

use super::command::Cli;
use super::context::Context;
use super::output;
use crate::error::Result;

/// Print the effective configuration.
pub fn execute_show(cli: &Cli, ctx: &Context) -> Result<()> {
    if output::is_json() {
        output::json_output(serde_json::to_value(&ctx.config)?);
        return Ok(());
    }

    output::section("Configuration");
    let source = if cli.config.exists() {
        cli.config.display().to_string()
    } else {
        format!("{} (not found, using defaults)", cli.config.display())
    };
    output::field("Source", source);
    output::field("Base URL", ctx.config.exchange.base_url());
    output::lines(&ctx.config.to_toml()?);
    Ok(())
}
