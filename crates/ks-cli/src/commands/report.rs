//! The report command: fetch a period from Kimai, print it, export it.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ks_core::console::write_report;
use ks_core::{
    Activity, Catalog, CsvLayout, Project, ReportRange, TimesheetEntry, Totals, export_csv, group,
};
use ks_kimai::{Client, TimesheetQuery};

use crate::Config;

/// What to report on and how to render it.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub range: ReportRange,
    pub extended: bool,
    pub csv: Option<PathBuf>,
    /// Day the condensed CSV time blocks are anchored on.
    pub today: NaiveDate,
}

/// Everything fetched from Kimai for one report.
#[derive(Debug, Clone, Default)]
pub struct ReportInput {
    pub projects: Vec<Project>,
    pub activities: Vec<Activity>,
    pub entries: Vec<TimesheetEntry>,
}

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, config: &Config, options: &ReportOptions) -> Result<()> {
    let (url, token) = config.credentials()?;
    let client = Client::new(url, token).context("failed to create Kimai client")?;

    let (begin, end) = options.range.query_bounds();
    let mut query = TimesheetQuery::new(begin, end);
    query.user.clone_from(&config.user);
    query.projects.clone_from(&config.projects);
    query.size = config.page_size;

    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let input = runtime.block_on(fetch(&client, &query))?;

    render(writer, input, options)
}

async fn fetch(client: &Client, query: &TimesheetQuery) -> Result<ReportInput> {
    let projects = client
        .projects()
        .await
        .context("failed to fetch Kimai projects")?;
    let activities = client
        .activities()
        .await
        .context("failed to fetch Kimai activities")?;
    let entries = client
        .timesheets(query)
        .await
        .context("failed to fetch Kimai timesheets")?;

    tracing::debug!(
        projects = projects.len(),
        activities = activities.len(),
        entries = entries.len(),
        "fetched report data"
    );

    Ok(ReportInput {
        projects,
        activities,
        entries,
    })
}

/// Groups `input`, prints the console report and writes the CSV export.
pub fn render<W: Write>(writer: &mut W, input: ReportInput, options: &ReportOptions) -> Result<()> {
    let catalog = Catalog::new(input.projects, input.activities);
    let sheet = group(input.entries, &catalog);
    let totals = Totals::of(&sheet);

    write_report(writer, &sheet, &totals, &options.range, options.extended)
        .context("failed to write report")?;
    writer.flush().context("failed to write report")?;

    if let Some(path) = &options.csv {
        let layout = CsvLayout::select(options.extended, options.today);
        export_csv(path, &sheet, layout)
            .with_context(|| format!("failed to export CSV to {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ks_core::KimaiTime;

    use super::*;

    fn range() -> ReportRange {
        ReportRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap(),
        )
    }

    fn at(clock: &str) -> KimaiTime {
        let value = format!("2024-01-02T{clock}:00+0100");
        KimaiTime::parse(&value).unwrap()
    }

    /// An entry on 2024-01-02; `begin` and `end` are `HH:MM`.
    fn entry(id: i64, begin: &str, end: &str, duration: i64, rate: f64) -> TimesheetEntry {
        TimesheetEntry {
            id,
            activity: 10,
            project: 1,
            begin: at(begin),
            end: at(end),
            duration,
            description: format!("task {id}"),
            rate,
            internal_rate: None,
        }
    }

    fn input() -> ReportInput {
        ReportInput {
            projects: vec![Project {
                id: 1,
                name: "Website".to_string(),
            }],
            activities: vec![Activity {
                id: 10,
                name: "Design".to_string(),
            }],
            entries: vec![
                entry(1, "09:00", "10:00", 3600, 80.0),
                entry(2, "13:00", "13:30", 1800, 40.0),
            ],
        }
    }

    fn options(csv: Option<PathBuf>, extended: bool) -> ReportOptions {
        ReportOptions {
            range: range(),
            extended,
            csv,
            today: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
        }
    }

    #[test]
    fn test_render_prints_report_without_csv() {
        let mut out = Vec::new();
        render(&mut out, input(), &options(None, false)).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("\t📌 Website\n"));
        assert!(output.contains("\t\t🕖 09:00 -> 10:00: task 1\n"));
        assert!(output.ends_with("🕖 1,50 Stunden -> 120,00 € / 142,80 € (brutto)\n"));
    }

    #[test]
    fn test_render_writes_condensed_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("january.csv");

        let options = options(Some(path.clone()), false);
        render(&mut Vec::new(), input(), &options).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Datum;Beginn;Ende;Dauer;Projekt;Beschreibung;Preis\n\
             02.01.2024;09:00;10:30;1.50;Website;task 1, task 2;120.00 €\n"
        );
    }

    #[test]
    fn test_render_writes_detailed_csv_in_extended_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("january.csv");

        let options = options(Some(path.clone()), true);
        render(&mut Vec::new(), input(), &options).unwrap();

        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert_eq!(
            csv.lines().nth(2).unwrap(),
            "02.01.2024;13:00;13:30;0.50;Website;Design;task 2;40.00 €"
        );
    }

    #[test]
    fn test_render_fails_on_unwritable_csv_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.csv");

        let options = options(Some(path), false);
        let err = render(&mut Vec::new(), input(), &options).unwrap_err();

        assert!(format!("{err:#}").contains("failed to export CSV"));
    }

    #[test]
    fn test_run_requires_credentials() {
        let err = run(&mut Vec::new(), &Config::default(), &options(None, false)).unwrap_err();
        assert!(err.to_string().contains("Kimai URL required"));
    }
}
