use serde::Serialize;

use crate::models::{ClassRoutine, EntryField, Role, ScheduleEntry, SchoolDay, WeeklySchedule};
use crate::services::OwnerEvent;

pub const MISSING_CELL: &str = "-";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridCell {
    Missing { placeholder: &'static str },
    Entry { entry: ScheduleEntry },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridRow {
    /// Break or lunch: one label spanning every day, never editable.
    Merged { period: String, label: String },
    Periods { period: String, cells: Vec<GridCell> },
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutineGrid {
    pub class_name: String,
    pub days: Vec<SchoolDay>,
    pub rows: Vec<GridRow>,
    pub editable: bool,
    pub has_changes: bool,
    pub can_save: bool,
}

/// Local draft of one class's weekly routine, committed to the owner on save.
#[derive(Debug)]
pub struct RoutineEditor {
    role: Role,
    class_name: String,
    revision: Option<i64>,
    editable_routine: WeeklySchedule,
    has_changes: bool,
}

impl RoutineEditor {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            class_name: String::new(),
            revision: None,
            editable_routine: WeeklySchedule::new(),
            has_changes: false,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn routine(&self) -> &WeeklySchedule {
        &self.editable_routine
    }

    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    pub fn can_edit(&self) -> bool {
        self.role.can_edit_routine()
    }

    /// Resets the working copy when the owner's routine is a different class or revision.
    pub fn sync_from_owner(&mut self, canonical: &ClassRoutine) -> bool {
        if self.class_name == canonical.class_name && self.revision == Some(canonical.revision) {
            return false;
        }
        self.reset_to_canonical(canonical);
        true
    }

    /// Last writer wins: drops every unsaved edit and copies the owner's routine.
    pub fn reset_to_canonical(&mut self, canonical: &ClassRoutine) {
        self.class_name = canonical.class_name.clone();
        self.revision = Some(canonical.revision);
        self.editable_routine = canonical.schedule.clone();
        self.has_changes = false;
    }

    /// Leaves the editor without a class, e.g. when the selected class disappeared.
    pub fn clear(&mut self) {
        self.class_name.clear();
        self.revision = None;
        self.editable_routine.clear();
        self.has_changes = false;
    }

    pub fn max_periods(&self) -> usize {
        SchoolDay::ALL
            .iter()
            .map(|day| self.editable_routine.get(day).map_or(0, Vec::len))
            .max()
            .unwrap_or(0)
    }

    pub fn entry(&self, day: SchoolDay, period_index: usize) -> Option<&ScheduleEntry> {
        self.editable_routine.get(&day)?.get(period_index)
    }

    /// Writes one field of a cell, growing the day with blank entries when it is too short.
    pub fn set_field(&mut self, day: SchoolDay, period_index: usize, field: EntryField, value: &str) {
        if !self.can_edit() {
            return;
        }

        let entries = self.editable_routine.entry(day).or_default();
        if entries.len() <= period_index {
            entries.resize_with(period_index + 1, ScheduleEntry::default);
        }

        let entry = &mut entries[period_index];
        match field {
            EntryField::Subject => entry.subject = value.to_string(),
            EntryField::Teacher => entry.teacher = Some(value.to_string()),
            EntryField::Notes => entry.notes = Some(value.to_string()),
        }
        self.has_changes = true;
    }

    /// Renames a period on every day that has an entry at `period_index`.
    /// Days shorter than that keep whatever label they had.
    pub fn set_period_label(&mut self, period_index: usize, value: &str) {
        if !self.can_edit() {
            return;
        }

        for entries in self.editable_routine.values_mut() {
            if let Some(entry) = entries.get_mut(period_index) {
                entry.period = value.to_string();
            }
        }
        self.has_changes = true;
    }

    pub fn period_label(&self, period_index: usize) -> &str {
        self.entry(SchoolDay::CANONICAL, period_index)
            .map_or("", |e| e.period.as_str())
    }

    /// Only the canonical day decides whether a row is a break or lunch.
    pub fn is_sentinel_row(&self, period_index: usize) -> bool {
        self.entry(SchoolDay::CANONICAL, period_index)
            .is_some_and(ScheduleEntry::is_sentinel)
    }

    pub fn grid(&self) -> RoutineGrid {
        let rows = (0..self.max_periods())
            .map(|period_index| {
                let period = self.period_label(period_index).to_string();

                if let Some(first) = self
                    .entry(SchoolDay::CANONICAL, period_index)
                    .filter(|e| e.is_sentinel())
                {
                    return GridRow::Merged {
                        period,
                        label: first.subject.clone(),
                    };
                }

                let cells = SchoolDay::ALL
                    .iter()
                    .map(|day| match self.entry(*day, period_index) {
                        Some(entry) => GridCell::Entry {
                            entry: entry.clone(),
                        },
                        None => GridCell::Missing {
                            placeholder: MISSING_CELL,
                        },
                    })
                    .collect();

                GridRow::Periods { period, cells }
            })
            .collect();

        RoutineGrid {
            class_name: self.class_name.clone(),
            days: SchoolDay::ALL.to_vec(),
            rows,
            editable: self.can_edit(),
            has_changes: self.has_changes,
            can_save: self.can_edit() && self.has_changes,
        }
    }

    /// Hands the whole working copy to the owner. The edits stay dirty until
    /// the owner confirms with `mark_saved`.
    pub fn save(&self) -> Option<OwnerEvent> {
        if !self.can_edit() || !self.has_changes {
            return None;
        }
        Some(OwnerEvent::UpdateRoutine {
            class_name: self.class_name.clone(),
            routine: self.editable_routine.clone(),
        })
    }

    pub fn mark_saved(&mut self) {
        self.has_changes = false;
    }
}
