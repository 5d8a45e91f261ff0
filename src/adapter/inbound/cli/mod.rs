//! CLI module graph.

pub mod bracket;
pub mod check;
pub mod command;
pub mod config;
pub mod console;
pub mod context;
pub mod dispatch;
pub mod grid;
pub mod order;
pub mod output;
pub mod paths;
pub mod twap;
