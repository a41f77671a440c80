//! Kimai timesheet report CLI library.
//!
//! This crate provides the CLI interface for the timesheet report.

mod cli;
pub mod commands;
mod config;
pub mod period;

pub use cli::Cli;
pub use config::Config;
