//! Parameter validation.
//!
//! Normalize-or-reject checks applied to raw operator input before any
//! network call. Each builder returns an immutable request type from
//! [`crate::domain::request`] or the first [`ValidationError`] found.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::request::{
    BracketParams, GridParams, LimitOrderParams, MarketOrderParams, StopLimitParams, TwapParams,
};
use crate::domain::{OrderSide, Symbol, TimeInForce};
use crate::error::ValidationError;

/// Quote asset every supported symbol must settle in.
pub const QUOTE_ASSET: &str = "USDT";

/// Symbols with deep futures liquidity. Others are accepted with a warning.
pub const COMMON_SYMBOLS: &[&str] = &[
    "BTCUSDT", "ETHUSDT", "BNBUSDT", "ADAUSDT", "DOGEUSDT", "XRPUSDT", "DOTUSDT", "UNIUSDT",
    "SOLUSDT", "MATICUSDT", "LTCUSDT", "LINKUSDT", "AVAXUSDT", "ATOMUSDT", "ETCUSDT",
];

/// Bounds applied by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingLimits {
    /// Smallest order quantity accepted, inclusive.
    pub min_quantity: Decimal,
    pub twap_min_orders: u32,
    pub twap_max_orders: u32,
    pub twap_min_duration_minutes: u32,
    pub twap_max_duration_minutes: u32,
    pub grid_min_levels: u32,
    pub grid_max_levels: u32,
}

impl Default for TradingLimits {
    fn default() -> Self {
        Self {
            min_quantity: Decimal::new(1, 3),
            twap_min_orders: 2,
            twap_max_orders: 100,
            twap_min_duration_minutes: 1,
            twap_max_duration_minutes: 1440,
            grid_min_levels: 2,
            grid_max_levels: 50,
        }
    }
}

/// Validator for operator-supplied trading parameters.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: TradingLimits,
}

impl Validator {
    #[must_use]
    pub const fn new(limits: TradingLimits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub const fn limits(&self) -> &TradingLimits {
        &self.limits
    }

    /// Upper-case and trim a symbol; it must settle in USDT.
    pub fn symbol(&self, raw: &str) -> Result<Symbol, ValidationError> {
        let symbol = raw.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::new("symbol", "cannot be empty"));
        }
        if !symbol.ends_with(QUOTE_ASSET) || symbol.len() == QUOTE_ASSET.len() {
            return Err(ValidationError::new(
                "symbol",
                format!("{symbol} must be a {QUOTE_ASSET}-margined pair (e.g. BTCUSDT)"),
            ));
        }
        if !COMMON_SYMBOLS.contains(&symbol.as_str()) {
            warn!(symbol = %symbol, "Symbol is not in the common list, proceeding anyway");
        }
        Ok(Symbol::new(symbol))
    }

    pub fn side(&self, raw: &str) -> Result<OrderSide, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::new("side", "cannot be empty"));
        }
        raw.parse().map_err(|reason| ValidationError::new("side", reason))
    }

    pub fn time_in_force(&self, raw: &str) -> Result<TimeInForce, ValidationError> {
        raw.parse()
            .map_err(|reason| ValidationError::new("time_in_force", reason))
    }

    /// Quantity must be positive and at least the configured minimum.
    pub fn quantity(&self, quantity: Decimal) -> Result<Decimal, ValidationError> {
        self.quantity_field("quantity", quantity)
    }

    fn quantity_field(&self, field: &'static str, quantity: Decimal) -> Result<Decimal, ValidationError> {
        if quantity <= Decimal::ZERO {
            return Err(ValidationError::new(field, format!("{quantity} must be greater than 0")));
        }
        if quantity < self.limits.min_quantity {
            return Err(ValidationError::new(
                field,
                format!("{quantity} is below minimum {}", self.limits.min_quantity),
            ));
        }
        Ok(quantity)
    }

    /// Price must be strictly positive.
    pub fn price(&self, field: &'static str, price: Decimal) -> Result<Decimal, ValidationError> {
        if price <= Decimal::ZERO {
            return Err(ValidationError::new(field, format!("{price} must be greater than 0")));
        }
        Ok(price)
    }

    /// Both bounds positive and `lower < upper`.
    pub fn price_range(
        &self,
        lower: Decimal,
        upper: Decimal,
    ) -> Result<(Decimal, Decimal), ValidationError> {
        let lower = self.price("lower_price", lower)?;
        let upper = self.price("upper_price", upper)?;
        if lower >= upper {
            return Err(ValidationError::new(
                "price_range",
                format!("lower {lower} must be less than upper {upper}"),
            ));
        }
        Ok((lower, upper))
    }

    pub fn grid_levels(&self, levels: u32) -> Result<u32, ValidationError> {
        in_bounds("grid_levels", levels, self.limits.grid_min_levels, self.limits.grid_max_levels)
    }

    pub fn twap_order_count(&self, count: u32) -> Result<u32, ValidationError> {
        in_bounds("num_orders", count, self.limits.twap_min_orders, self.limits.twap_max_orders)
    }

    pub fn twap_duration(&self, minutes: u32) -> Result<u32, ValidationError> {
        in_bounds(
            "duration_minutes",
            minutes,
            self.limits.twap_min_duration_minutes,
            self.limits.twap_max_duration_minutes,
        )
    }

    /// Validate a TWAP request. Each child slice must also meet the minimum.
    pub fn twap(
        &self,
        symbol: &str,
        side: &str,
        total_quantity: Decimal,
        child_order_count: u32,
        duration_minutes: u32,
    ) -> Result<TwapParams, ValidationError> {
        let symbol = self.symbol(symbol)?;
        let side = self.side(side)?;
        let total_quantity = self.quantity(total_quantity)?;
        let child_order_count = self.twap_order_count(child_order_count)?;
        let duration_minutes = self.twap_duration(duration_minutes)?;

        let per_child = total_quantity / Decimal::from(child_order_count);
        self.quantity_field("quantity_per_order", per_child)?;

        debug!(symbol = %symbol, children = child_order_count, "TWAP parameters valid");
        Ok(TwapParams {
            symbol,
            side,
            total_quantity,
            child_order_count,
            duration_minutes,
        })
    }

    /// Validate a grid request.
    pub fn grid(
        &self,
        symbol: &str,
        lower_price: Decimal,
        upper_price: Decimal,
        level_count: u32,
        quantity_per_level: Decimal,
    ) -> Result<GridParams, ValidationError> {
        let symbol = self.symbol(symbol)?;
        let (lower_bound, upper_bound) = self.price_range(lower_price, upper_price)?;
        let level_count = self.grid_levels(level_count)?;
        let quantity_per_level = self.quantity(quantity_per_level)?;

        debug!(symbol = %symbol, levels = level_count, "Grid parameters valid");
        Ok(GridParams {
            symbol,
            lower_bound,
            upper_bound,
            level_count,
            quantity_per_level,
        })
    }

    /// Validate a take-profit / stop-loss pair.
    ///
    /// A SELL pair closes a long, so take-profit sits above the stop. A BUY
    /// pair closes a short, so take-profit sits below the stop.
    pub fn bracket(
        &self,
        symbol: &str,
        side: &str,
        quantity: Decimal,
        take_profit_price: Decimal,
        stop_price: Decimal,
        stop_limit_price: Decimal,
    ) -> Result<BracketParams, ValidationError> {
        let symbol = self.symbol(symbol)?;
        let side = self.side(side)?;
        let quantity = self.quantity(quantity)?;
        let take_profit_price = self.price("take_profit_price", take_profit_price)?;
        let stop_price = self.price("stop_price", stop_price)?;
        let stop_limit_price = self.price("stop_limit_price", stop_limit_price)?;

        match side {
            OrderSide::Sell if take_profit_price <= stop_price => {
                return Err(ValidationError::new(
                    "take_profit_price",
                    format!(
                        "SELL take-profit {take_profit_price} must be above stop {stop_price}"
                    ),
                ));
            }
            OrderSide::Buy if take_profit_price >= stop_price => {
                return Err(ValidationError::new(
                    "take_profit_price",
                    format!("BUY take-profit {take_profit_price} must be below stop {stop_price}"),
                ));
            }
            _ => {}
        }
        warn_limit_beyond_stop(side, stop_price, stop_limit_price);

        Ok(BracketParams {
            symbol,
            side,
            quantity,
            take_profit_price,
            stop_price,
            stop_limit_price,
        })
    }

    pub fn market(
        &self,
        symbol: &str,
        side: &str,
        quantity: Decimal,
    ) -> Result<MarketOrderParams, ValidationError> {
        Ok(MarketOrderParams {
            symbol: self.symbol(symbol)?,
            side: self.side(side)?,
            quantity: self.quantity(quantity)?,
        })
    }

    pub fn limit(
        &self,
        symbol: &str,
        side: &str,
        quantity: Decimal,
        price: Decimal,
        time_in_force: &str,
    ) -> Result<LimitOrderParams, ValidationError> {
        Ok(LimitOrderParams {
            symbol: self.symbol(symbol)?,
            side: self.side(side)?,
            quantity: self.quantity(quantity)?,
            price: self.price("price", price)?,
            time_in_force: self.time_in_force(time_in_force)?,
        })
    }

    /// Validate a stop-limit order. A limit on the wrong side of the
    /// trigger only produces a warning.
    pub fn stop_limit(
        &self,
        symbol: &str,
        side: &str,
        quantity: Decimal,
        stop_price: Decimal,
        limit_price: Decimal,
        time_in_force: &str,
    ) -> Result<StopLimitParams, ValidationError> {
        let symbol = self.symbol(symbol)?;
        let side = self.side(side)?;
        let quantity = self.quantity(quantity)?;
        let stop_price = self.price("stop_price", stop_price)?;
        let limit_price = self.price("limit_price", limit_price)?;
        let time_in_force = self.time_in_force(time_in_force)?;

        warn_limit_beyond_stop(side, stop_price, limit_price);

        Ok(StopLimitParams {
            symbol,
            side,
            quantity,
            stop_price,
            limit_price,
            time_in_force,
        })
    }
}

/// Whether a stop-limit's limit price sits on the side that may not fill
/// after the trigger.
#[must_use]
pub fn limit_beyond_stop(side: OrderSide, stop_price: Decimal, limit_price: Decimal) -> bool {
    match side {
        OrderSide::Buy => limit_price < stop_price,
        OrderSide::Sell => limit_price > stop_price,
    }
}

fn warn_limit_beyond_stop(side: OrderSide, stop_price: Decimal, limit_price: Decimal) {
    if limit_beyond_stop(side, stop_price, limit_price) {
        warn!(
            side = %side,
            stop = %stop_price,
            limit = %limit_price,
            "Stop-limit limit price is on the far side of the trigger and may not execute"
        );
    }
}

fn in_bounds(field: &'static str, value: u32, min: u32, max: u32) -> Result<u32, ValidationError> {
    if value < min {
        return Err(ValidationError::new(field, format!("{value} must be at least {min}")));
    }
    if value > max {
        return Err(ValidationError::new(field, format!("{value} exceeds maximum {max}")));
    }
    Ok(value)
}
