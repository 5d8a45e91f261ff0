//! Exchange trading rules for a symbol.
//!
//! Prices must sit on the tick grid and quantities on the lot step. Plans
//! divide freely (a 10-rung ladder over 38000..42000 has a step of
//! 444.44...), so every order is conformed here before it goes out.
//!
//! # Examples
//!
//! ```
//! use strata::domain::filters::SymbolFilters;
//! use rust_decimal_macros::dec;
//!
//! let filters = SymbolFilters::new(dec!(0.10), dec!(0.001), dec!(0.001));
//! assert_eq!(filters.conform_price(dec!(38444.4444)), dec!(38444.4));
//! assert_eq!(filters.conform_quantity(dec!(0.33333)).unwrap(), dec!(0.333));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::error::DomainError;

/// Tick size, lot step and minimum quantity for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbolFilters {
    tick_size: Decimal,
    step_size: Decimal,
    min_quantity: Decimal,
}

impl SymbolFilters {
    #[must_use]
    pub const fn new(tick_size: Decimal, step_size: Decimal, min_quantity: Decimal) -> Self {
        Self {
            tick_size,
            step_size,
            min_quantity,
        }
    }

    #[must_use]
    pub const fn tick_size(&self) -> Decimal {
        self.tick_size
    }

    #[must_use]
    pub const fn step_size(&self) -> Decimal {
        self.step_size
    }

    #[must_use]
    pub const fn min_quantity(&self) -> Decimal {
        self.min_quantity
    }

    /// Round `price` to the nearest tick. A zero tick leaves it unchanged.
    #[must_use]
    pub fn conform_price(&self, price: Decimal) -> Decimal {
        if self.tick_size <= Decimal::ZERO {
            return price;
        }
        let ticks = (price / self.tick_size)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        (ticks * self.tick_size).normalize()
    }

    /// Round `quantity` down to the lot step, then check the minimum.
    ///
    /// Never rounds up: sending more than was asked for is worse than
    /// sending slightly less.
    pub fn conform_quantity(&self, quantity: Decimal) -> Result<Decimal, DomainError> {
        let conformed = if self.step_size <= Decimal::ZERO {
            quantity
        } else {
            ((quantity / self.step_size).floor() * self.step_size).normalize()
        };
        if conformed <= Decimal::ZERO || conformed < self.min_quantity {
            return Err(DomainError::BelowLotMinimum {
                quantity,
                minimum: self.min_quantity.max(self.step_size),
            });
        }
        Ok(conformed)
    }
}
