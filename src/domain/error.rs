//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors when an invariant
//! of a derived plan (grid ladder, TWAP plan) does not hold.
//!
//! # Examples
//!
//! ```
//! use strata::domain::error::DomainError;
//! use strata::domain::grid::GridLadder;
//! use rust_decimal_macros::dec;
//!
//! let result = GridLadder::try_new(dec!(42000), dec!(38000), 10);
//! assert!(matches!(result, Err(DomainError::InvertedRange { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Ladder bounds must be strictly ordered.
    #[error("lower bound {lower} must be below upper bound {upper}")]
    InvertedRange {
        /// The lower bound that was provided.
        lower: Decimal,
        /// The upper bound that was provided.
        upper: Decimal,
    },

    /// A ladder needs at least its two endpoints.
    #[error("level count must be at least 2, got {count}")]
    TooFewLevels {
        /// The invalid level count.
        count: u32,
    },

    /// A TWAP plan needs at least two child orders.
    #[error("child order count must be at least 2, got {count}")]
    TooFewChildren {
        /// The invalid child count.
        count: u32,
    },

    /// Quantity must be positive for trading operations.
    #[error("quantity must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// The invalid quantity.
        quantity: Decimal,
    },

    /// Quantity rounds down below the exchange lot minimum.
    #[error("quantity {quantity} is below the exchange lot minimum {minimum}")]
    BelowLotMinimum {
        /// The requested quantity.
        quantity: Decimal,
        /// Smallest quantity the exchange accepts.
        minimum: Decimal,
    },
}
