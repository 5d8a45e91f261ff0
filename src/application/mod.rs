//! Application services (use cases).
//!
//! These services validate operator input and drive the domain through the
//! outbound ports.
//!
//! - [`validator`] - normalize-or-reject checks producing request types
//! - [`twap`] - time-sliced market execution
//! - [`grid`] - static resting-order ladder
//! - [`bracket`] - paired take-profit / stop-loss placement
//! - [`order`] - single market, limit and stop-limit orders

pub mod bracket;
pub mod grid;
pub mod order;
pub mod twap;
pub mod validator;

pub use bracket::BracketPlacer;
pub use grid::GridPlanner;
pub use order::OrderService;
pub use twap::TwapExecutor;
pub use validator::{TradingLimits, Validator};
