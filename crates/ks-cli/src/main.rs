use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ks_cli::commands::report::{self, ReportOptions};
use ks_cli::period::{Period, resolve_range};
use ks_cli::{Cli, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout carries only the report
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_cli(&cli);
    tracing::debug!(?config, "loaded configuration");

    let today = Local::now().date_naive();
    let range = resolve_range(cli.begin, cli.end, Period::from_flag(cli.last_month), today);
    tracing::debug!(begin = %range.begin, end = %range.end, "resolved report range");

    let options = ReportOptions {
        range,
        extended: cli.extended,
        csv: cli.csv,
        today,
    };

    let stdout = std::io::stdout();
    report::run(&mut stdout.lock(), &config, &options)
}
