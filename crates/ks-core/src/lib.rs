//! Report engine for Kimai timesheets.
//!
//! This crate contains the fundamental types and logic for:
//! - Model: timesheet entries, projects, activities and Kimai timestamps
//! - Grouping: the date → project → activity hierarchy
//! - Aggregation: hour and amount totals, per-project-per-day summaries
//! - Rendering: the console tree and the two CSV layouts

pub mod aggregate;
pub mod console;
pub mod csv_export;
pub mod format;
pub mod grouping;
pub mod model;

#[cfg(test)]
mod fixtures;

pub use aggregate::{GROSS_FACTOR, ProjectDaySummary, Totals, merge_descriptions};
pub use csv_export::{CsvLayout, ExportError, export_csv, write_csv};
pub use grouping::{ActivityGroup, DateGroup, ProjectGroup, Timesheet, group};
pub use model::{Activity, Catalog, KimaiTime, Project, ReportRange, TimestampError, TimesheetEntry};
