//! Handler for the `check` command.

use chrono::Utc;

use super::context::Context;
use super::output;
use crate::adapter::outbound::binance::credentials::{mask, API_KEY_VAR, API_SECRET_VAR};
use crate::adapter::outbound::binance::Credentials;
use crate::error::Result;
use crate::port::ExchangeGateway;

/// Ping the exchange, compare clocks and report whether credentials are set.
pub async fn execute(ctx: &Context) -> Result<()> {
    let client = ctx.public_client();

    output::section("Connection Check");
    output::field("Exchange", client.exchange_name());
    output::field("Environment", ctx.environment());
    output::field("API", client.base_url());

    let pb = output::spinner("Checking REST API...");
    match client.ping().await {
        Ok(()) => output::spinner_success(&pb, "REST API reachable"),
        Err(e) => {
            output::spinner_fail(&pb, "REST API unreachable");
            return Err(e);
        }
    }

    let pb = output::spinner("Reading server time...");
    match client.server_time().await {
        Ok(server_time) => {
            let skew_ms = (Utc::now() - server_time).num_milliseconds();
            output::spinner_success(&pb, &format!("Server time {}", server_time.format("%Y-%m-%d %H:%M:%S UTC")));
            output::field("Clock skew", format!("{skew_ms} ms"));
            if skew_ms.unsigned_abs() > ctx.config.exchange.recv_window_ms {
                output::warning("local clock is outside the receive window; signed requests will be rejected");
            }
        }
        Err(e) => {
            output::spinner_fail(&pb, "Server time unavailable");
            return Err(e);
        }
    }

    match Credentials::from_env() {
        Ok(credentials) => output::field("API key", mask(credentials.api_key())),
        Err(e) => {
            output::warning(&format!("credentials not usable: {e}"));
            output::hint(&format!("set {API_KEY_VAR} and {API_SECRET_VAR} (a .env file works too)"));
        }
    }

    output::success("Connection checks passed");
    Ok(())
}
