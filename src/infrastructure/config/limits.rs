//! Trading limits and grid configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::grid::DEFAULT_PRICE_TOLERANCE;
use crate::application::validator::TradingLimits;
use crate::error::ConfigError;

/// Validator bounds (`[limits]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Smallest accepted order quantity.
    #[serde(default = "default_min_quantity")]
    pub min_quantity: Decimal,
    #[serde(default = "default_twap_min_orders")]
    pub twap_min_orders: u32,
    #[serde(default = "default_twap_max_orders")]
    pub twap_max_orders: u32,
    #[serde(default = "default_twap_min_duration_minutes")]
    pub twap_min_duration_minutes: u32,
    /// Upper bound on a TWAP run (default: 24 hours).
    #[serde(default = "default_twap_max_duration_minutes")]
    pub twap_max_duration_minutes: u32,
    #[serde(default = "default_grid_min_levels")]
    pub grid_min_levels: u32,
    #[serde(default = "default_grid_max_levels")]
    pub grid_max_levels: u32,
}

fn default_min_quantity() -> Decimal {
    Decimal::new(1, 3) // 0.001
}

const fn default_twap_min_orders() -> u32 {
    2
}

const fn default_twap_max_orders() -> u32 {
    100
}

const fn default_twap_min_duration_minutes() -> u32 {
    1
}

const fn default_twap_max_duration_minutes() -> u32 {
    1440
}

const fn default_grid_min_levels() -> u32 {
    2
}

const fn default_grid_max_levels() -> u32 {
    50
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_quantity: default_min_quantity(),
            twap_min_orders: default_twap_min_orders(),
            twap_max_orders: default_twap_max_orders(),
            twap_min_duration_minutes: default_twap_min_duration_minutes(),
            twap_max_duration_minutes: default_twap_max_duration_minutes(),
            grid_min_levels: default_grid_min_levels(),
            grid_max_levels: default_grid_max_levels(),
        }
    }
}

impl LimitsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_quantity <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "limits.min_quantity",
                reason: "must be greater than 0".to_string(),
            });
        }
        // Plans need at least two children and a ladder needs both endpoints.
        if self.twap_min_orders < 2 || self.twap_min_orders > self.twap_max_orders {
            return Err(ConfigError::InvalidValue {
                field: "limits.twap_min_orders",
                reason: "must be at least 2 and <= twap_max_orders".to_string(),
            });
        }
        if self.twap_min_duration_minutes == 0
            || self.twap_min_duration_minutes > self.twap_max_duration_minutes
        {
            return Err(ConfigError::InvalidValue {
                field: "limits.twap_min_duration_minutes",
                reason: "must be at least 1 and <= twap_max_duration_minutes".to_string(),
            });
        }
        if self.grid_min_levels < 2 || self.grid_min_levels > self.grid_max_levels {
            return Err(ConfigError::InvalidValue {
                field: "limits.grid_min_levels",
                reason: "must be at least 2 and <= grid_max_levels".to_string(),
            });
        }
        Ok(())
    }
}

impl From<LimitsConfig> for TradingLimits {
    fn from(config: LimitsConfig) -> Self {
        Self {
            min_quantity: config.min_quantity,
            twap_min_orders: config.twap_min_orders,
            twap_max_orders: config.twap_max_orders,
            twap_min_duration_minutes: config.twap_min_duration_minutes,
            twap_max_duration_minutes: config.twap_max_duration_minutes,
            grid_min_levels: config.grid_min_levels,
            grid_max_levels: config.grid_max_levels,
        }
    }
}

/// Grid placement settings (`[grid]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Rungs within this distance of the market price get no order.
    #[serde(default = "default_price_tolerance")]
    pub price_tolerance: Decimal,
}

const fn default_price_tolerance() -> Decimal {
    DEFAULT_PRICE_TOLERANCE
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            price_tolerance: default_price_tolerance(),
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.price_tolerance < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "grid.price_tolerance",
                reason: "must be 0 or greater".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_validator_defaults() {
        assert_eq!(TradingLimits::from(LimitsConfig::default()), TradingLimits::default());
    }

    #[test]
    fn single_child_minimum_is_rejected() {
        let config = LimitsConfig {
            twap_min_orders: 1,
            ..LimitsConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
