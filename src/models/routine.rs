use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Subjects that mark a whole row as a pause rather than a lesson.
pub const SENTINEL_SUBJECTS: [&str; 2] = ["Break", "Lunch"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 6] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
        SchoolDay::Saturday,
    ];

    /// The day whose entries supply the period label column and sentinel detection.
    pub const CANONICAL: SchoolDay = SchoolDay::Monday;

    pub fn as_str(self) -> &'static str {
        match self {
            SchoolDay::Monday => "Monday",
            SchoolDay::Tuesday => "Tuesday",
            SchoolDay::Wednesday => "Wednesday",
            SchoolDay::Thursday => "Thursday",
            SchoolDay::Friday => "Friday",
            SchoolDay::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for SchoolDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub period: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ScheduleEntry {
    pub fn new(period: &str, subject: &str, teacher: Option<&str>) -> Self {
        Self {
            period: period.to_string(),
            subject: subject.to_string(),
            teacher: teacher.map(str::to_string),
            notes: None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        SENTINEL_SUBJECTS.contains(&self.subject.as_str())
    }
}

/// Editable fields of a single cell. The period label is edited per row instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryField {
    Subject,
    Teacher,
    Notes,
}

pub type DaySchedule = Vec<ScheduleEntry>;

pub type WeeklySchedule = BTreeMap<SchoolDay, DaySchedule>;

pub type FullSchoolRoutine = BTreeMap<String, WeeklySchedule>;

/// Canonical routine of one class as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRoutine {
    pub class_name: String,
    pub schedule: WeeklySchedule,
    pub revision: i64,
}
