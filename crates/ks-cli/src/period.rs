//! Report period calculation.
//!
//! Without explicit bounds a report covers a whole calendar month: from the
//! first day at 00:00:00 to the last day at 23:59:59.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use ks_core::ReportRange;
use ks_core::model::QUERY_TIME_FORMAT;

/// Default report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    CurrentMonth,
    LastMonth,
}

impl Period {
    pub const fn from_flag(last_month: bool) -> Self {
        if last_month {
            Self::LastMonth
        } else {
            Self::CurrentMonth
        }
    }
}

/// Parses a `YYYY-MM-DDThh:mm:ss` command-line bound.
pub fn parse_bound(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, QUERY_TIME_FORMAT)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Calculates the month boundaries for `period`, relative to `today`.
pub fn month_range(period: Period, today: NaiveDate) -> ReportRange {
    let this_month = first_of_month(today);
    let (first, next) = match period {
        Period::CurrentMonth => (this_month, first_of_month(this_month + Duration::days(31))),
        Period::LastMonth => (first_of_month(this_month - Duration::days(1)), this_month),
    };

    ReportRange::new(
        first.and_time(NaiveTime::MIN),
        next.and_time(NaiveTime::MIN) - Duration::seconds(1),
    )
}

/// Combines explicit bounds with the default month for any missing side.
pub fn resolve_range(
    begin: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    period: Period,
    today: NaiveDate,
) -> ReportRange {
    let month = month_range(period, today);
    ReportRange::new(begin.unwrap_or(month.begin), end.unwrap_or(month.end))
}
