//! Kimai records and the lookup entities they reference.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::format::{DATE_FORMAT, DATE_TIME_FORMAT, TIME_FORMAT};

/// Timestamp layout used by the Kimai API, e.g. `2024-01-15T09:30:00+0100`.
pub const KIMAI_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Layout Kimai expects for `begin`/`end` query parameters.
pub const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A timestamp that does not match [`KIMAI_TIME_FORMAT`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid Kimai timestamp {value:?}: {source}")]
pub struct TimestampError {
    pub value: String,
    #[source]
    pub source: chrono::ParseError,
}

/// A point in time as reported by Kimai, keeping the server's UTC offset.
///
/// Calendar dates and clock times are always taken in that offset, so the
/// report shows the same wall-clock values the Kimai UI does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KimaiTime(DateTime<FixedOffset>);

impl KimaiTime {
    /// Parses a `YYYY-MM-DDThh:mm:ss±hhmm` timestamp.
    pub fn parse(value: &str) -> Result<Self, TimestampError> {
        DateTime::parse_from_str(value, KIMAI_TIME_FORMAT)
            .map(Self)
            .map_err(|source| TimestampError {
                value: value.to_string(),
                source,
            })
    }

    pub const fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    /// Calendar date in the timestamp's own offset.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Fixed-width `YYYY-MM-DD` key; sorts lexicographically in date order.
    pub fn date_key(&self) -> String {
        self.date().format("%Y-%m-%d").to_string()
    }

    /// `DD.MM.YYYY`
    pub fn date_label(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }

    /// `HH:MM`, 24-hour clock.
    pub fn clock(&self) -> String {
        self.0.format(TIME_FORMAT).to_string()
    }
}

impl FromStr for KimaiTime {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for KimaiTime {
    type Error = TimestampError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<KimaiTime> for String {
    fn from(time: KimaiTime) -> Self {
        time.to_string()
    }
}

impl fmt::Display for KimaiTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KIMAI_TIME_FORMAT))
    }
}

/// A Kimai project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

/// A Kimai activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub name: String,
}

/// One timesheet record.
///
/// Values are taken as Kimai reports them: negative durations, an end before
/// the begin, or ids that match no known project are all accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetEntry {
    pub id: i64,
    pub activity: i64,
    pub project: i64,
    pub begin: KimaiTime,
    pub end: KimaiTime,
    /// Seconds.
    #[serde(default)]
    pub duration: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Net amount billed for this record.
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub internal_rate: Option<f64>,
}

impl TimesheetEntry {
    pub fn project_key(&self) -> String {
        self.project.to_string()
    }

    pub fn activity_key(&self) -> String {
        self.activity.to_string()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Projects and activities keyed by the string form of their id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    projects: HashMap<String, Project>,
    activities: HashMap<String, Activity>,
}

impl Catalog {
    pub fn new(
        projects: impl IntoIterator<Item = Project>,
        activities: impl IntoIterator<Item = Activity>,
    ) -> Self {
        Self {
            projects: projects
                .into_iter()
                .map(|project| (project.id.to_string(), project))
                .collect(),
            activities: activities
                .into_iter()
                .map(|activity| (activity.id.to_string(), activity))
                .collect(),
        }
    }

    pub fn project(&self, key: &str) -> Option<&Project> {
        self.projects.get(key)
    }

    pub fn activity(&self, key: &str) -> Option<&Activity> {
        self.activities.get(key)
    }
}

/// The requested report window, echoed in the console summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportRange {
    pub const fn new(begin: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { begin, end }
    }

    /// Both bounds in [`QUERY_TIME_FORMAT`].
    pub fn query_bounds(&self) -> (String, String) {
        (
            self.begin.format(QUERY_TIME_FORMAT).to_string(),
            self.end.format(QUERY_TIME_FORMAT).to_string(),
        )
    }

    /// Both bounds as `DD.MM.YYYY, HH:MM`.
    pub fn labels(&self) -> (String, String) {
        (
            self.begin.format(DATE_TIME_FORMAT).to_string(),
            self.end.format(DATE_TIME_FORMAT).to_string(),
        )
    }
}
