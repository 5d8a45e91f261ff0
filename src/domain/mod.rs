//! Exchange-agnostic domain types.
//!
//! Pure data and arithmetic: no I/O, no async. Executors in
//! [`crate::application`] drive these types through the ports.
//!
//! - [`id`] - symbol and order identifiers
//! - [`order`] - sides, time-in-force, typed gateway outcomes
//! - [`filters`] - exchange tick and lot rules
//! - [`account`] - wallet balances
//! - [`request`] - validated strategy parameters
//! - [`twap`] - TWAP plan, records, report and VWAP
//! - [`grid`] - grid ladder, rung outcomes and setup report
//! - [`bracket`] - paired take-profit / stop-loss report
//! - [`report`] - single-order report

pub mod account;
pub mod bracket;
pub mod error;
pub mod filters;
pub mod grid;
pub mod id;
pub mod order;
pub mod report;
pub mod request;
pub mod twap;

pub use account::AssetBalance;
pub use filters::SymbolFilters;
pub use id::{ClientOrderId, OrderId, Symbol};
pub use order::{ImmediateFill, OrderAck, OrderSide, OrderState, TimeInForce};
