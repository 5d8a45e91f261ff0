//! Account balances.

use rust_decimal::Decimal;
use serde::Serialize;

/// Futures wallet balance for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetBalance {
    pub asset: String,
    /// Wallet balance.
    pub balance: Decimal,
    /// Balance free for new orders.
    pub available: Decimal,
    /// Unrealized profit of cross positions.
    pub unrealized_pnl: Decimal,
}

impl AssetBalance {
    /// Whether every amount is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.available.is_zero() && self.unrealized_pnl.is_zero()
    }
}
