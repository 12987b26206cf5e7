//! CLI module for the prayer-time board
pub mod commands;
pub mod completions;
pub mod display;
pub mod show;

pub use commands::{Cli, Commands, ShowArgs};
pub use display::Display;
pub use show::{evaluate_day, DayReport};
