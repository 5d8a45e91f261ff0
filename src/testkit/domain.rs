//! Builders for validated request types used across tests.

use rust_decimal::Decimal;

use crate::domain::request::{BracketParams, GridParams, TwapParams};
use crate::domain::{OrderSide, Symbol};

/// A TWAP request for `total` split into `children` over `minutes`.
pub fn twap_params(side: OrderSide, total: Decimal, children: u32, minutes: u32) -> TwapParams {
    TwapParams {
        symbol: Symbol::from("BTCUSDT"),
        side,
        total_quantity: total,
        child_order_count: children,
        duration_minutes: minutes,
    }
}

/// A grid request with `quantity` per rung.
pub fn grid_params(lower: Decimal, upper: Decimal, levels: u32, quantity: Decimal) -> GridParams {
    GridParams {
        symbol: Symbol::from("BTCUSDT"),
        lower_bound: lower,
        upper_bound: upper,
        level_count: levels,
        quantity_per_level: quantity,
    }
}

/// A SELL bracket closing a long at `take_profit` or `stop`, with the stop
/// limit one unit below the trigger.
pub fn sell_bracket(quantity: Decimal, take_profit: Decimal, stop: Decimal) -> BracketParams {
    BracketParams {
        symbol: Symbol::from("BTCUSDT"),
        side: OrderSide::Sell,
        quantity,
        take_profit_price: take_profit,
        stop_price: stop,
        stop_limit_price: stop - Decimal::ONE,
    }
}
