//! Shared test data.

use chrono::Duration;

use crate::model::{Activity, Catalog, KimaiTime, Project, TimesheetEntry};

pub fn entry(
    id: i64,
    project: i64,
    activity: i64,
    begin: &str,
    duration: i64,
    rate: f64,
    description: &str,
) -> TimesheetEntry {
    let begin = KimaiTime::parse(begin).unwrap();
    let end = (*begin.as_datetime() + Duration::seconds(duration))
        .format(crate::model::KIMAI_TIME_FORMAT)
        .to_string();
    TimesheetEntry {
        id,
        activity,
        project,
        begin,
        end: KimaiTime::parse(&end).unwrap(),
        duration,
        description: description.to_string(),
        rate,
        internal_rate: None,
    }
}

pub fn sample_catalog() -> Catalog {
    Catalog::new(
        vec![
            Project {
                id: 1,
                name: "P1".to_string(),
            },
            Project {
                id: 2,
                name: "P2".to_string(),
            },
        ],
        vec![
            Activity {
                id: 10,
                name: "A1".to_string(),
            },
            Activity {
                id: 20,
                name: "A2".to_string(),
            },
        ],
    )
}

/// Three entries on two days: 3.5 hours and 35.00 in total.
pub fn sample_entries() -> Vec<TimesheetEntry> {
    vec![
        entry(1, 1, 10, "2024-01-01T09:00:00+0100", 3600, 10.0, "Setup"),
        entry(2, 1, 20, "2024-01-01T10:00:00+0100", 1800, 5.0, "Review"),
        entry(3, 2, 10, "2024-01-02T13:00:00+0100", 7200, 20.0, "Coding"),
    ]
}
