//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;

use crate::period::parse_bound;

/// Kimai timesheet report.
///
/// Prints the entries of a period grouped by day, project and activity,
/// with hour and amount totals, and optionally exports them as CSV.
#[derive(Debug, Parser)]
#[command(name = "timesheet", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Kimai API URL (e.g., <https://kimai.example.com/api>).
    #[arg(long)]
    pub url: Option<String>,

    /// Kimai API token.
    #[arg(long)]
    pub api_token: Option<String>,

    /// Kimai user id (defaults to the token owner).
    #[arg(long)]
    pub user: Option<String>,

    /// Only include these project ids (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub projects: Vec<u64>,

    /// Begin of the period (YYYY-MM-DDThh:mm:ss).
    #[arg(long, value_parser = parse_bound)]
    pub begin: Option<NaiveDateTime>,

    /// End of the period (YYYY-MM-DDThh:mm:ss).
    #[arg(long, value_parser = parse_bound)]
    pub end: Option<NaiveDateTime>,

    /// Default to the previous month instead of the current one.
    #[arg(long)]
    pub last_month: bool,

    /// Show activities and export one CSV row per entry.
    #[arg(long)]
    pub extended: bool,

    /// Write a CSV export to this file.
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,
}
