pub mod note;
pub mod role;
pub mod routine;

pub use note::{EditNoteRequest, NewNoteRequest, Note};
pub use role::{Role, User};
pub use routine::{
    ClassRoutine, DaySchedule, EntryField, FullSchoolRoutine, ScheduleEntry, SchoolDay,
    WeeklySchedule, SENTINEL_SUBJECTS,
};
