//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! trading logic.
//!
//! - [`config`] - Configuration loading and validation, logging setup

pub mod config;
