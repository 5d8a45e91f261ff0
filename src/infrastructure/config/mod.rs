//! Configuration loading, validation and logging bootstrap.
//!
//! - [`settings`] - top-level [`Config`](settings::Config)
//! - [`limits`] - validator bounds and grid tolerance
//! - [`logging`] - tracing subscriber setup

pub mod limits;
pub mod logging;
pub mod settings;

pub use settings::Config;
