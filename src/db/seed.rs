use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{ScheduleEntry, SchoolDay, WeeklySchedule};

pub const DEFAULT_CLASSES: [&str; 3] = ["8", "9", "10"];

const PERIODS: [&str; 8] = [
    "10:00 - 10:45",
    "10:45 - 11:30",
    "11:30 - 12:15",
    "12:15 - 12:30",
    "12:30 - 13:15",
    "13:15 - 14:00",
    "14:00 - 14:30",
    "14:30 - 15:15",
];

const SUBJECTS: [(&str, &str); 7] = [
    ("English", "Mr. Shrestha"),
    ("Mathematics", "Mrs. Karki"),
    ("Science", "Mr. Adhikari"),
    ("Nepali", "Mrs. Maharjan"),
    ("Social Studies", "Mr. Thapa"),
    ("Computer", "Ms. Rai"),
    ("Health & P.E.", "Mr. Gurung"),
];

/// Saturday is a half day: three lessons and the break.
const SATURDAY_PERIODS: usize = 4;

/// A full week for one class. Subjects rotate by day and class so that
/// no two classes share the same grid.
pub fn default_schedule(class_offset: usize) -> WeeklySchedule {
    let mut schedule = WeeklySchedule::new();

    for (day_index, day) in SchoolDay::ALL.into_iter().enumerate() {
        let mut lesson = 0;
        let mut entries: Vec<ScheduleEntry> = PERIODS
            .iter()
            .enumerate()
            .map(|(slot, period)| match slot {
                3 => ScheduleEntry::new(period, "Break", None),
                6 => ScheduleEntry::new(period, "Lunch", None),
                _ => {
                    let (subject, teacher) =
                        SUBJECTS[(day_index + class_offset + lesson) % SUBJECTS.len()];
                    lesson += 1;
                    ScheduleEntry::new(period, subject, Some(teacher))
                }
            })
            .collect();

        if day == SchoolDay::Saturday {
            entries.truncate(SATURDAY_PERIODS);
        }
        schedule.insert(day, entries);
    }

    schedule
}

/// Fills an empty store with the default classes and a welcome note.
pub async fn seed_defaults(db: &SqlitePool) -> Result<(), AppError> {
    if repository::list_classes(db).await?.is_empty() {
        for (offset, class_name) in DEFAULT_CLASSES.iter().enumerate() {
            repository::save_routine(db, class_name, &default_schedule(offset)).await?;
        }
        info!("seeded routines for {} classes", DEFAULT_CLASSES.len());
    }

    if repository::fetch_notes(db).await?.is_empty() {
        repository::insert_note(
            db,
            "Welcome to the new school dashboard. Class routines and announcements will be posted here.",
            "Administration",
        )
        .await?;
        info!("seeded welcome note");
    }

    Ok(())
}
