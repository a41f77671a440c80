//! Indented console report. Each level is one tab, shown below as spaces.
//!
//! ```text
//! 🗓️ 01.01.2024
//!     📌 Website
//!         📋 Design          (extended only)
//!             🕖 09:00 -> 10:00: Mockups
//!
//! Start: 01.01.2024, 00:00
//! Ende: 31.01.2024, 23:59
//!
//! 🕖 3,50 Stunden -> 35,00 € / 41,65 € (brutto)
//! ```

use std::io::{self, Write};

use crate::aggregate::Totals;
use crate::format::{CURRENCY, german_decimal};
use crate::grouping::Timesheet;
use crate::model::{ReportRange, TimesheetEntry};

const CALENDAR: &str = "\u{1f5d3}\u{fe0f}";
const PIN: &str = "\u{1f4cc}";
const CLIPBOARD: &str = "\u{1f4cb}";
const CLOCK: &str = "\u{1f556}";

/// Writes the report tree followed by the requested range and the totals.
///
/// With `extended`, entries are additionally grouped under their activity.
pub fn write_report<W: Write>(
    out: &mut W,
    sheet: &Timesheet,
    totals: &Totals,
    range: &ReportRange,
    extended: bool,
) -> io::Result<()> {
    let indent = if extended { "\t\t\t" } else { "\t\t" };

    for day in sheet.days() {
        writeln!(out, "{CALENDAR} {}", day.date().date_label())?;

        for project in day.projects() {
            writeln!(out, "\t{PIN} {}", project.name())?;

            for activity in project.activities() {
                if extended {
                    writeln!(out, "\t\t{CLIPBOARD} {}", activity.name())?;
                }
                for entry in activity.entries() {
                    write_entry(out, indent, entry)?;
                }
            }
        }
    }

    let (begin, end) = range.labels();
    writeln!(out)?;
    writeln!(out, "Start: {begin}")?;
    writeln!(out, "Ende: {end}")?;
    writeln!(out)?;
    writeln!(
        out,
        "{CLOCK} {} Stunden -> {} {CURRENCY} / {} {CURRENCY} (brutto)",
        german_decimal(totals.hours),
        german_decimal(totals.amount),
        german_decimal(totals.gross()),
    )
}

fn write_entry<W: Write>(out: &mut W, indent: &str, entry: &TimesheetEntry) -> io::Result<()> {
    writeln!(
        out,
        "{indent}{CLOCK} {} -> {}: {}",
        entry.begin.clock(),
        entry.end.clock(),
        entry.description
    )
}
