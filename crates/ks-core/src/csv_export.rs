//! CSV export of a grouped timesheet.
//!
//! Both layouts use `;` as separator and LF line endings. Fields are quoted
//! only when they contain the separator, a quote or a line break, so plain
//! rows match what spreadsheet imports of the legacy export expect.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::aggregate::{ProjectDaySummary, hours};
use crate::format::{TIME_FORMAT, price};
use crate::grouping::Timesheet;

/// Header of the per-entry layout.
pub const DETAILED_HEADER: [&str; 8] = [
    "Datum",
    "Beginn",
    "Ende",
    "Dauer",
    "Projekt",
    "Tätigkeit",
    "Beschreibung",
    "Preis",
];

/// Header of the per-project-per-day layout.
pub const CONDENSED_HEADER: [&str; 7] = [
    "Datum",
    "Beginn",
    "Ende",
    "Dauer",
    "Projekt",
    "Beschreibung",
    "Preis",
];

/// Hour at which condensed rows start their synthetic time block.
const BLOCK_START_HOUR: i64 = 9;

/// CSV export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The destination file could not be created.
    #[error("failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Writing a record failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    /// Flushing the output failed.
    #[error("failed to flush CSV: {0}")]
    Io(#[from] io::Error),
}

/// Row layout of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// One row per entry, including the activity.
    Detailed,
    /// One row per project and day. Each row gets a contiguous block starting
    /// at 09:00 on `anchor` and lasting the summed duration.
    Condensed { anchor: NaiveDate },
}

impl CsvLayout {
    /// Extended reports export every entry; otherwise rows are condensed,
    /// anchored on `today`.
    pub const fn select(extended: bool, today: NaiveDate) -> Self {
        if extended {
            Self::Detailed
        } else {
            Self::Condensed { anchor: today }
        }
    }
}

/// Start and end of the synthetic block for a condensed row.
pub fn synthetic_block(anchor: NaiveDate, duration: i64) -> (NaiveDateTime, NaiveDateTime) {
    let begin = anchor.and_time(NaiveTime::MIN) + Duration::hours(BLOCK_START_HOUR);
    (begin, begin + Duration::seconds(duration))
}

/// Writes `sheet` to `out` and returns the number of data rows.
pub fn write_csv<W: io::Write>(
    out: W,
    sheet: &Timesheet,
    layout: CsvLayout,
) -> Result<usize, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(out);

    let rows = match layout {
        CsvLayout::Detailed => write_detailed(&mut writer, sheet)?,
        CsvLayout::Condensed { anchor } => write_condensed(&mut writer, sheet, anchor)?,
    };

    writer.flush()?;
    Ok(rows)
}

/// Creates (or truncates) `path` and writes the export to it.
pub fn export_csv(path: &Path, sheet: &Timesheet, layout: CsvLayout) -> Result<usize, ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = write_csv(BufWriter::new(file), sheet, layout)?;
    tracing::info!(path = %path.display(), rows, "wrote CSV export");
    Ok(rows)
}

fn write_detailed<W: io::Write>(
    writer: &mut csv::Writer<W>,
    sheet: &Timesheet,
) -> Result<usize, csv::Error> {
    writer.write_record(DETAILED_HEADER)?;

    let mut rows = 0;
    for day in sheet.days() {
        let date = day.date().date_label();
        for project in day.projects() {
            for activity in project.activities() {
                for entry in activity.entries() {
                    writer.write_record([
                        date.as_str(),
                        entry.begin.clock().as_str(),
                        entry.end.clock().as_str(),
                        format!("{:.2}", hours(entry.duration)).as_str(),
                        project.name(),
                        activity.name(),
                        entry.description.as_str(),
                        price(entry.rate).as_str(),
                    ])?;
                    rows += 1;
                }
            }
        }
    }
    Ok(rows)
}

fn write_condensed<W: io::Write>(
    writer: &mut csv::Writer<W>,
    sheet: &Timesheet,
    anchor: NaiveDate,
) -> Result<usize, csv::Error> {
    writer.write_record(CONDENSED_HEADER)?;

    let mut rows = 0;
    for day in sheet.days() {
        let date = day.date().date_label();
        for project in day.projects() {
            let summary = ProjectDaySummary::of(project);
            let (begin, end) = synthetic_block(anchor, summary.duration);
            writer.write_record([
                date.as_str(),
                begin.format(TIME_FORMAT).to_string().as_str(),
                end.format(TIME_FORMAT).to_string().as_str(),
                format!("{:.2}", summary.hours()).as_str(),
                project.name(),
                summary.descriptions.join(", ").as_str(),
                price(summary.amount).as_str(),
            ])?;
            rows += 1;
        }
    }
    Ok(rows)
}
