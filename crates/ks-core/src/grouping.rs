//! Builds the date → project → activity hierarchy from a flat entry list.
//!
//! Days are iterated in ascending date order. Projects within a day and
//! activities within a project keep the order in which the grouping pass
//! first saw them, and entries keep their input order. Rendering the same
//! input therefore always produces the same output.

use std::collections::HashMap;

use crate::model::{Activity, Catalog, KimaiTime, Project, TimesheetEntry};

/// Insertion-ordered map keyed by string ids.
#[derive(Debug, Clone)]
struct Keyed<V> {
    items: Vec<V>,
    index: HashMap<String, usize>,
}

impl<V> Default for Keyed<V> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> Keyed<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    /// Returns the value for `key`, creating it with `make` on first sight.
    /// The flag is `true` when the value was just created.
    fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> (&mut V, bool) {
        let (slot, created) = if let Some(&i) = self.index.get(key) {
            (i, false)
        } else {
            let i = self.items.len();
            self.items.push(make());
            self.index.insert(key.to_string(), i);
            (i, true)
        };
        (&mut self.items[slot], created)
    }

    fn iter(&self) -> std::slice::Iter<'_, V> {
        self.items.iter()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Entries of one activity within one project on one day.
#[derive(Debug, Clone)]
pub struct ActivityGroup {
    key: String,
    activity: Option<Activity>,
    entries: Vec<TimesheetEntry>,
}

impl ActivityGroup {
    fn new(key: &str, activity: Option<&Activity>) -> Self {
        Self {
            key: key.to_string(),
            activity: activity.cloned(),
            entries: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `None` when the activity id is not in the catalog.
    pub const fn activity(&self) -> Option<&Activity> {
        self.activity.as_ref()
    }

    /// Display name; empty for unknown activities.
    pub fn name(&self) -> &str {
        self.activity.as_ref().map_or("", |a| a.name.as_str())
    }

    pub fn entries(&self) -> &[TimesheetEntry] {
        &self.entries
    }
}

/// All activities of one project on one day.
#[derive(Debug, Clone)]
pub struct ProjectGroup {
    key: String,
    project: Option<Project>,
    activities: Keyed<ActivityGroup>,
}

impl ProjectGroup {
    fn new(key: &str, project: Option<&Project>) -> Self {
        Self {
            key: key.to_string(),
            project: project.cloned(),
            activities: Keyed::default(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `None` when the project id is not in the catalog.
    pub const fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// Display name; empty for unknown projects.
    pub fn name(&self) -> &str {
        self.project.as_ref().map_or("", |p| p.name.as_str())
    }

    pub fn activities(&self) -> impl Iterator<Item = &ActivityGroup> {
        self.activities.iter()
    }

    pub fn activity(&self, key: &str) -> Option<&ActivityGroup> {
        self.activities.get(key)
    }

    /// Every entry of the project, activity by activity.
    pub fn entries(&self) -> impl Iterator<Item = &TimesheetEntry> {
        self.activities.iter().flat_map(|a| a.entries.iter())
    }
}

/// All projects worked on during one calendar day.
#[derive(Debug, Clone)]
pub struct DateGroup {
    key: String,
    date: KimaiTime,
    projects: Keyed<ProjectGroup>,
}

impl DateGroup {
    fn new(key: &str, date: KimaiTime) -> Self {
        Self {
            key: key.to_string(),
            date,
            projects: Keyed::default(),
        }
    }

    /// `YYYY-MM-DD`
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Begin of the first entry seen for this day.
    pub const fn date(&self) -> KimaiTime {
        self.date
    }

    pub fn projects(&self) -> impl Iterator<Item = &ProjectGroup> {
        self.projects.iter()
    }

    pub fn project(&self, key: &str) -> Option<&ProjectGroup> {
        self.projects.get(key)
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

/// The grouped report: one [`DateGroup`] per day that has entries.
#[derive(Debug, Clone, Default)]
pub struct Timesheet {
    days: Keyed<DateGroup>,
    dates: Vec<String>,
}

impl Timesheet {
    /// Date keys in ascending order, each exactly once.
    pub fn date_keys(&self) -> &[String] {
        &self.dates
    }

    /// Days in ascending date order.
    pub fn days(&self) -> impl Iterator<Item = &DateGroup> {
        self.dates.iter().filter_map(|key| self.days.get(key))
    }

    pub fn day(&self, key: &str) -> Option<&DateGroup> {
        self.days.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &TimesheetEntry> {
        self.days()
            .flat_map(DateGroup::projects)
            .flat_map(ProjectGroup::entries)
    }

    pub fn entry_count(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Groups `entries` by day, project and activity.
///
/// Ids missing from `catalog` yield groups without a resolved project or
/// activity rather than an error. No entry is dropped.
pub fn group(entries: impl IntoIterator<Item = TimesheetEntry>, catalog: &Catalog) -> Timesheet {
    let mut days: Keyed<DateGroup> = Keyed::default();
    let mut dates = Vec::new();

    for entry in entries {
        let date_key = entry.begin.date_key();
        let project_key = entry.project_key();
        let activity_key = entry.activity_key();

        let make_day = || DateGroup::new(&date_key, entry.begin);
        let (day, new_day) = days.get_or_insert_with(&date_key, make_day);
        if new_day {
            dates.push(date_key.clone());
        }

        let make_project = || ProjectGroup::new(&project_key, catalog.project(&project_key));
        let (project, new_project) = day.projects.get_or_insert_with(&project_key, make_project);
        if new_project && project.project.is_none() {
            tracing::trace!(project = %project_key, "project not in catalog");
        }

        let make_activity = || ActivityGroup::new(&activity_key, catalog.activity(&activity_key));
        let (activity, _) = project
            .activities
            .get_or_insert_with(&activity_key, make_activity);
        activity.entries.push(entry);
    }

    dates.sort();
    tracing::debug!(days = dates.len(), "grouped timesheet entries");

    Timesheet { days, dates }
}
