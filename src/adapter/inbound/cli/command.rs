//! Command-line interface definitions.
//!
//! Defines the CLI structure for strata using `clap`. Positional arguments
//! are parsed as raw values and handed to the validator unchanged, so a bad
//! quantity or price is reported with the same field names everywhere.

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use super::paths;

/// TWAP, grid and bracket order execution for Binance USDT-M futures
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Use the testnet endpoint regardless of configuration
    #[arg(long, global = true, conflicts_with = "production")]
    pub testnet: bool,

    /// Use the production endpoint regardless of configuration
    #[arg(long, global = true)]
    pub production: bool,

    /// Skip the confirmation prompt before placing orders
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the strata CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Place a market order
    Market(MarketArgs),

    /// Place a limit order
    Limit(LimitArgs),

    /// Place a stop-limit order
    StopLimit(StopLimitArgs),

    /// Place a take-profit and a stop-loss order for an open position
    Oco(OcoArgs),

    /// Split a market order into equal slices over time
    Twap(TwapArgs),

    /// Place a static ladder of limit orders between two prices
    Grid(GridArgs),

    /// Show the current price of a symbol
    Price(PriceArgs),

    /// Cancel an open order
    Cancel(CancelArgs),

    /// Show the current state of an order
    Status(StatusArgs),

    /// Show futures wallet balances
    Balance(BalanceArgs),

    /// Check connectivity and credentials
    Check,

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `strata config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show,
}

/// Arguments for `strata market`.
#[derive(Args, Debug)]
pub struct MarketArgs {
    /// Trading pair (e.g. BTCUSDT)
    pub symbol: String,

    /// BUY or SELL
    pub side: String,

    /// Order quantity
    #[arg(allow_negative_numbers = true)]
    pub quantity: Decimal,
}

/// Arguments for `strata limit`.
#[derive(Args, Debug)]
pub struct LimitArgs {
    /// Trading pair (e.g. BTCUSDT)
    pub symbol: String,

    /// BUY or SELL
    pub side: String,

    /// Order quantity
    #[arg(allow_negative_numbers = true)]
    pub quantity: Decimal,

    /// Limit price
    #[arg(allow_negative_numbers = true)]
    pub price: Decimal,

    /// Time in force (GTC, IOC, FOK)
    #[arg(long, default_value = "GTC")]
    pub tif: String,
}

/// Arguments for `strata stop-limit`.
#[derive(Args, Debug)]
pub struct StopLimitArgs {
    /// Trading pair (e.g. BTCUSDT)
    pub symbol: String,

    /// BUY or SELL
    pub side: String,

    /// Order quantity
    #[arg(allow_negative_numbers = true)]
    pub quantity: Decimal,

    /// Price that triggers the order
    #[arg(allow_negative_numbers = true)]
    pub stop_price: Decimal,

    /// Limit price once triggered
    #[arg(allow_negative_numbers = true)]
    pub limit_price: Decimal,

    /// Time in force (GTC, IOC, FOK)
    #[arg(long, default_value = "GTC")]
    pub tif: String,
}

/// Arguments for `strata oco`.
///
/// SIDE is the side of both closing legs: SELL closes a long, BUY closes
/// a short.
#[derive(Args, Debug)]
pub struct OcoArgs {
    /// Trading pair (e.g. BTCUSDT)
    pub symbol: String,

    /// Side of the closing orders (SELL closes a long, BUY closes a short)
    pub side: String,

    /// Position quantity to close
    #[arg(allow_negative_numbers = true)]
    pub quantity: Decimal,

    /// Take-profit limit price
    #[arg(allow_negative_numbers = true)]
    pub take_profit_price: Decimal,

    /// Stop-loss trigger price
    #[arg(allow_negative_numbers = true)]
    pub stop_price: Decimal,

    /// Stop-loss limit price once triggered
    #[arg(allow_negative_numbers = true)]
    pub stop_limit_price: Decimal,
}

/// Arguments for `strata twap`.
#[derive(Args, Debug)]
pub struct TwapArgs {
    /// Trading pair (e.g. BTCUSDT)
    pub symbol: String,

    /// BUY or SELL
    pub side: String,

    /// Total quantity to execute
    #[arg(allow_negative_numbers = true)]
    pub total_quantity: Decimal,

    /// Number of child orders
    pub num_orders: u32,

    /// Total run time in minutes
    pub duration_minutes: u32,
}

/// Arguments for `strata grid`.
#[derive(Args, Debug)]
pub struct GridArgs {
    /// Trading pair (e.g. BTCUSDT)
    pub symbol: String,

    /// Lowest rung price
    #[arg(allow_negative_numbers = true)]
    pub lower_price: Decimal,

    /// Highest rung price
    #[arg(allow_negative_numbers = true)]
    pub upper_price: Decimal,

    /// Number of rungs, both bounds included
    pub grid_levels: u32,

    /// Quantity for each rung
    #[arg(allow_negative_numbers = true)]
    pub quantity_per_level: Decimal,
}

/// Arguments for `strata price`.
#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Trading pair (e.g. BTCUSDT)
    pub symbol: String,
}

/// Arguments for `strata cancel`.
#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Trading pair (e.g. BTCUSDT)
    pub symbol: String,

    /// Exchange order ID
    pub order_id: String,
}

/// Arguments for `strata status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Trading pair (e.g. BTCUSDT)
    pub symbol: String,

    /// Exchange order ID
    pub order_id: String,
}

/// Arguments for `strata balance`.
#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Include assets with a zero balance
    #[arg(long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_command_factory_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "strata");
        assert!(cmd.get_version().is_some());
    }

    #[test]
    fn test_color_choice_default_is_auto() {
        assert!(matches!(ColorChoice::default(), ColorChoice::Auto));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["strata", "price", "BTCUSDT", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.yes);
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::try_parse_from(["strata", "-c", "/tmp/s.toml", "check"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/tmp/s.toml"));
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_parse_default_config_path() {
        let cli = Cli::try_parse_from(["strata", "check"]).unwrap();
        assert_eq!(cli.config, paths::default_config());
    }

    #[test]
    fn test_testnet_production_conflict() {
        let result = Cli::try_parse_from(["strata", "--testnet", "--production", "check"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_market() {
        let cli = Cli::try_parse_from(["strata", "market", "BTCUSDT", "buy", "0.01"]).unwrap();
        let Commands::Market(args) = cli.command else {
            panic!("Expected Market command");
        };
        assert_eq!(args.symbol, "BTCUSDT");
        assert_eq!(args.side, "buy");
        assert_eq!(args.quantity, dec!(0.01));
    }

    #[test]
    fn test_parse_limit_with_tif() {
        let cli = Cli::try_parse_from([
            "strata", "limit", "ETHUSDT", "SELL", "0.5", "3500", "--tif", "IOC",
        ])
        .unwrap();
        let Commands::Limit(args) = cli.command else {
            panic!("Expected Limit command");
        };
        assert_eq!(args.price, dec!(3500));
        assert_eq!(args.tif, "IOC");
    }

    #[test]
    fn test_parse_limit_default_tif() {
        let cli = Cli::try_parse_from(["strata", "limit", "ETHUSDT", "SELL", "0.5", "3500"]).unwrap();
        let Commands::Limit(args) = cli.command else {
            panic!("Expected Limit command");
        };
        assert_eq!(args.tif, "GTC");
    }

    #[test]
    fn test_parse_stop_limit() {
        let cli = Cli::try_parse_from([
            "strata", "stop-limit", "BTCUSDT", "SELL", "0.01", "39000", "38900",
        ])
        .unwrap();
        let Commands::StopLimit(args) = cli.command else {
            panic!("Expected StopLimit command");
        };
        assert_eq!(args.stop_price, dec!(39000));
        assert_eq!(args.limit_price, dec!(38900));
    }

    #[test]
    fn test_parse_oco() {
        let cli = Cli::try_parse_from([
            "strata", "oco", "BTCUSDT", "SELL", "0.01", "45000", "38000", "37900", "--yes",
        ])
        .unwrap();
        assert!(cli.yes);
        let Commands::Oco(args) = cli.command else {
            panic!("Expected Oco command");
        };
        assert_eq!(args.take_profit_price, dec!(45000));
        assert_eq!(args.stop_price, dec!(38000));
        assert_eq!(args.stop_limit_price, dec!(37900));
    }

    #[test]
    fn test_parse_twap() {
        let cli = Cli::try_parse_from(["strata", "twap", "BTCUSDT", "BUY", "0.1", "5", "10"]).unwrap();
        let Commands::Twap(args) = cli.command else {
            panic!("Expected Twap command");
        };
        assert_eq!(args.total_quantity, dec!(0.1));
        assert_eq!(args.num_orders, 5);
        assert_eq!(args.duration_minutes, 10);
    }

    #[test]
    fn test_parse_grid() {
        let cli =
            Cli::try_parse_from(["strata", "grid", "BTCUSDT", "38000", "42000", "10", "0.001"])
                .unwrap();
        let Commands::Grid(args) = cli.command else {
            panic!("Expected Grid command");
        };
        assert_eq!(args.lower_price, dec!(38000));
        assert_eq!(args.upper_price, dec!(42000));
        assert_eq!(args.grid_levels, 10);
    }

    #[test]
    fn test_negative_quantity_reaches_validator() {
        let cli = Cli::try_parse_from(["strata", "market", "BTCUSDT", "BUY", "-1"]).unwrap();
        let Commands::Market(args) = cli.command else {
            panic!("Expected Market command");
        };
        assert_eq!(args.quantity, dec!(-1));
    }

    #[test]
    fn test_non_numeric_quantity_is_a_parse_error() {
        assert!(Cli::try_parse_from(["strata", "market", "BTCUSDT", "BUY", "lots"]).is_err());
    }

    #[test]
    fn test_parse_cancel() {
        let cli = Cli::try_parse_from(["strata", "cancel", "BTCUSDT", "123456"]).unwrap();
        let Commands::Cancel(args) = cli.command else {
            panic!("Expected Cancel command");
        };
        assert_eq!(args.order_id, "123456");
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["strata", "status", "BTCUSDT", "4112391512"]).unwrap();
        let Commands::Status(args) = cli.command else {
            panic!("Expected Status command");
        };
        assert_eq!(args.symbol, "BTCUSDT");
        assert_eq!(args.order_id, "4112391512");
    }

    #[test]
    fn test_parse_balance() {
        let cli = Cli::try_parse_from(["strata", "balance"]).unwrap();
        let Commands::Balance(args) = cli.command else {
            panic!("Expected Balance command");
        };
        assert!(!args.all);

        let cli = Cli::try_parse_from(["strata", "balance", "--all", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Balance(BalanceArgs { all: true })));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["strata", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommand::Show)));
    }
}
