//! CLI command implementations.

pub mod report;
