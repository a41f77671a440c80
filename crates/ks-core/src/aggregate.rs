//! Hour and amount totals over a grouped timesheet.

use crate::grouping::{ProjectGroup, Timesheet};
use crate::model::TimesheetEntry;

/// Fixed surcharge applied to the net amount to get the gross figure.
pub const GROSS_FACTOR: f64 = 1.19;

/// Converts a duration in seconds to fractional hours.
#[allow(clippy::cast_precision_loss)]
pub fn hours(seconds: i64) -> f64 {
    seconds as f64 / 3600.0
}

/// Totals over every entry of a report.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub hours: f64,
    /// Net amount.
    pub amount: f64,
}

impl Totals {
    /// Sums all entries of `sheet` in date order.
    pub fn of(sheet: &Timesheet) -> Self {
        sheet.entries().fold(Self::default(), |mut totals, entry| {
            totals.add(entry);
            totals
        })
    }

    fn add(&mut self, entry: &TimesheetEntry) {
        self.hours += hours(entry.duration);
        self.amount += entry.rate;
    }

    /// Net amount times [`GROSS_FACTOR`].
    pub fn gross(&self) -> f64 {
        self.amount * GROSS_FACTOR
    }
}

/// Everything booked on one project during one day, across activities.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectDaySummary {
    /// Seconds.
    pub duration: i64,
    pub amount: f64,
    /// Description fragments, deduplicated in first-seen order.
    pub descriptions: Vec<String>,
}

impl ProjectDaySummary {
    pub fn of(project: &ProjectGroup) -> Self {
        let mut summary = Self {
            descriptions: merge_descriptions(
                project.entries().map(|entry| entry.description.as_str()),
            ),
            ..Self::default()
        };
        for entry in project.entries() {
            summary.duration += entry.duration;
            summary.amount += entry.rate;
        }
        summary
    }

    pub fn hours(&self) -> f64 {
        hours(self.duration)
    }
}

/// Splits descriptions on commas and keeps each trimmed fragment once.
///
/// Matching is exact and case-sensitive; the first occurrence wins.
pub fn merge_descriptions<'a>(descriptions: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut fragments: Vec<String> = Vec::new();
    for part in descriptions.into_iter().flat_map(|d| d.split(',')) {
        let part = part.trim();
        if !fragments.iter().any(|seen| seen == part) {
            fragments.push(part.to_string());
        }
    }
    fragments
}
