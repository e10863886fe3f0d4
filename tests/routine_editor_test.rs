use school_dashboard::models::{
    ClassRoutine, EntryField, Role, ScheduleEntry, SchoolDay, WeeklySchedule,
};
use school_dashboard::services::{GridCell, GridRow, MISSING_CELL, OwnerEvent, RoutineEditor};

fn entry(period: &str, subject: &str) -> ScheduleEntry {
    ScheduleEntry::new(period, subject, Some("Mr. Thapa"))
}

/// Monday and Tuesday have three periods, the second being lunch on Monday.
fn sample_routine(revision: i64) -> ClassRoutine {
    let mut schedule = WeeklySchedule::new();
    schedule.insert(
        SchoolDay::Monday,
        vec![entry("1st", "English"), entry("2nd", "Lunch"), entry("3rd", "Science")],
    );
    schedule.insert(
        SchoolDay::Tuesday,
        vec![entry("1st", "Nepali"), entry("2nd", "Computer"), entry("3rd", "Maths")],
    );
    schedule.insert(SchoolDay::Wednesday, vec![entry("1st", "Maths")]);
    ClassRoutine {
        class_name: "10".to_string(),
        schedule,
        revision,
    }
}

fn loaded(role: Role) -> RoutineEditor {
    let mut editor = RoutineEditor::new(role);
    editor.reset_to_canonical(&sample_routine(1));
    editor
}

#[test]
fn set_field_grows_short_day_with_blank_entries() {
    let mut editor = loaded(Role::Admin);

    editor.set_field(SchoolDay::Tuesday, 5, EntryField::Subject, "Art");

    let tuesday = &editor.routine()[&SchoolDay::Tuesday];
    assert_eq!(tuesday.len(), 6);
    assert_eq!(tuesday[3], ScheduleEntry::default());
    assert_eq!(tuesday[4], ScheduleEntry::default());
    assert_eq!(
        tuesday[5],
        ScheduleEntry {
            subject: "Art".to_string(),
            ..ScheduleEntry::default()
        }
    );
    assert!(editor.has_changes());
    assert_eq!(editor.max_periods(), 6);
}

#[test]
fn set_field_creates_missing_day() {
    let mut editor = loaded(Role::Admin);

    editor.set_field(SchoolDay::Saturday, 1, EntryField::Teacher, "Ms. Rai");

    let saturday = &editor.routine()[&SchoolDay::Saturday];
    assert_eq!(saturday.len(), 2);
    assert_eq!(saturday[1].teacher.as_deref(), Some("Ms. Rai"));
    assert_eq!(saturday[1].subject, "");
}

#[test]
fn set_field_edits_only_the_named_field() {
    let mut editor = loaded(Role::Admin);

    editor.set_field(SchoolDay::Monday, 0, EntryField::Notes, "Bring dictionaries");

    let monday = &editor.routine()[&SchoolDay::Monday][0];
    assert_eq!(monday.subject, "English");
    assert_eq!(monday.teacher.as_deref(), Some("Mr. Thapa"));
    assert_eq!(monday.notes.as_deref(), Some("Bring dictionaries"));
}

#[test]
fn period_label_changes_every_day_with_that_index_only() {
    let mut editor = loaded(Role::Admin);

    editor.set_period_label(2, "3rd (11:30)");

    let routine = editor.routine();
    assert_eq!(routine[&SchoolDay::Monday][2].period, "3rd (11:30)");
    assert_eq!(routine[&SchoolDay::Tuesday][2].period, "3rd (11:30)");
    assert_eq!(routine[&SchoolDay::Wednesday].len(), 1, "short days are not grown");
    assert_eq!(editor.period_label(2), "3rd (11:30)");
    assert!(editor.has_changes());
}

#[test]
fn grid_has_max_periods_rows_and_dash_placeholders() {
    let editor = loaded(Role::Student);
    let grid = editor.grid();

    assert_eq!(grid.rows.len(), 3);
    assert_eq!(grid.days.len(), 6);

    let GridRow::Periods { period, cells } = &grid.rows[0] else {
        panic!("first row should be a lesson row");
    };
    assert_eq!(period, "1st");
    assert_eq!(cells.len(), 6);
    assert!(matches!(&cells[0], GridCell::Entry { entry } if entry.subject == "English"));
    assert!(matches!(&cells[2], GridCell::Entry { entry } if entry.subject == "Maths"));
    assert_eq!(
        cells[3],
        GridCell::Missing {
            placeholder: MISSING_CELL
        }
    );

    let GridRow::Periods { cells, .. } = &grid.rows[2] else {
        panic!("third row should be a lesson row");
    };
    assert!(matches!(cells[2], GridCell::Missing { .. }));
}

#[test]
fn lunch_row_is_merged_for_every_role() {
    for role in [Role::Student, Role::Teacher, Role::Admin] {
        let editor = loaded(role);
        assert!(editor.is_sentinel_row(1));
        assert_eq!(
            editor.grid().rows[1],
            GridRow::Merged {
                period: "2nd".to_string(),
                label: "Lunch".to_string()
            },
            "role {:?}",
            role
        );
    }
}

#[test]
fn sentinel_detection_reads_canonical_day_only() {
    let mut editor = loaded(Role::Admin);

    // Tuesday diverges at index 1, the row stays merged.
    assert_eq!(editor.routine()[&SchoolDay::Tuesday][1].subject, "Computer");
    assert!(matches!(editor.grid().rows[1], GridRow::Merged { .. }));

    // A break on a non-canonical day does not merge the row.
    editor.set_field(SchoolDay::Tuesday, 0, EntryField::Subject, "Break");
    assert!(matches!(editor.grid().rows[0], GridRow::Periods { .. }));
}

#[test]
fn grid_reports_edit_capability_and_dirty_state() {
    let mut editor = loaded(Role::Admin);
    let grid = editor.grid();
    assert!(grid.editable);
    assert!(!grid.can_save);

    editor.set_field(SchoolDay::Monday, 0, EntryField::Subject, "Drama");
    let grid = editor.grid();
    assert!(grid.has_changes);
    assert!(grid.can_save);

    let teacher = loaded(Role::Teacher).grid();
    assert!(!teacher.editable);
    assert!(!teacher.can_save);
}

#[test]
fn save_emits_whole_routine_and_stays_dirty_until_stored() {
    let mut editor = loaded(Role::Admin);
    assert!(editor.save().is_none(), "nothing to save yet");

    editor.set_field(SchoolDay::Wednesday, 0, EntryField::Subject, "Music");
    let event = editor.save().expect("dirty editor should emit");

    let OwnerEvent::UpdateRoutine { class_name, routine } = event else {
        panic!("unexpected event: {:?}", event);
    };
    assert_eq!(class_name, "10");
    assert_eq!(routine, *editor.routine());
    assert_eq!(routine[&SchoolDay::Wednesday][0].subject, "Music");
    assert_eq!(routine[&SchoolDay::Monday].len(), 3);

    assert!(editor.has_changes(), "a failed store write can be retried");
    assert!(editor.grid().can_save);
    assert!(editor.save().is_some());

    editor.mark_saved();
    assert!(!editor.has_changes());
    assert!(editor.save().is_none());
}

#[test]
fn non_admin_edits_are_ignored() {
    for role in [Role::Student, Role::Teacher] {
        let mut editor = loaded(role);
        editor.set_field(SchoolDay::Tuesday, 5, EntryField::Subject, "Art");
        editor.set_period_label(0, "zero");

        assert_eq!(editor.routine(), &sample_routine(1).schedule);
        assert!(!editor.has_changes());
        assert!(editor.save().is_none());
    }
}

#[test]
fn owner_push_discards_unsaved_edits() {
    let mut editor = loaded(Role::Admin);
    editor.set_field(SchoolDay::Monday, 0, EntryField::Subject, "Unsaved");

    assert!(!editor.sync_from_owner(&sample_routine(1)), "same revision keeps the draft");
    assert!(editor.has_changes());

    let mut newer = sample_routine(2);
    newer
        .schedule
        .get_mut(&SchoolDay::Monday)
        .unwrap()[2]
        .subject = "Geography".to_string();

    assert!(editor.sync_from_owner(&newer));
    assert!(!editor.has_changes());
    assert_eq!(editor.routine(), &newer.schedule);
}

#[test]
fn switching_class_reloads_working_copy() {
    let mut editor = loaded(Role::Admin);
    editor.set_field(SchoolDay::Monday, 0, EntryField::Subject, "Unsaved");

    let mut other = sample_routine(1);
    other.class_name = "9".to_string();

    assert!(editor.sync_from_owner(&other));
    assert_eq!(editor.class_name(), "9");
    assert!(!editor.has_changes());
}

#[test]
fn empty_editor_renders_no_rows() {
    let editor = RoutineEditor::new(Role::Admin);
    assert_eq!(editor.max_periods(), 0);
    assert!(editor.grid().rows.is_empty());
    assert_eq!(editor.period_label(0), "");
}
