use serde::Serialize;

use crate::models::{Note, Role};
use crate::services::OwnerEvent;

pub const DELETE_CONFIRMATION: &str =
    "Are you sure you want to permanently delete this note? This action cannot be undone.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditDraft {
    pub note_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotesBoardView {
    pub notes: Vec<Note>,
    pub editing: Option<EditDraft>,
    pub can_post: bool,
}

/// Announcements as delivered by the owner, plus at most one note being edited.
#[derive(Debug)]
pub struct NotesBoard {
    role: Role,
    notes: Vec<Note>,
    editing: Option<EditDraft>,
}

impl NotesBoard {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            notes: Vec::new(),
            editing: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn can_post(&self) -> bool {
        self.role.can_post_note()
    }

    /// Displays the owner's list as is; the board never reorders it. A draft
    /// whose note is gone is dropped.
    pub fn sync_from_owner(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        let orphaned = self
            .editing
            .as_ref()
            .is_some_and(|draft| !self.notes.iter().any(|n| n.id == draft.note_id));
        if orphaned {
            self.editing = None;
        }
    }

    pub fn add(&self, content: &str) -> Option<OwnerEvent> {
        if !self.can_post() || content.trim().is_empty() {
            return None;
        }
        Some(OwnerEvent::AddNote {
            content: content.to_string(),
        })
    }

    /// Opens `id` for editing, replacing any other open draft.
    pub fn start_edit(&mut self, id: &str) -> bool {
        if !self.can_post() {
            return false;
        }
        let Some(note) = self.notes.iter().find(|n| n.id == id) else {
            return false;
        };
        self.editing = Some(EditDraft {
            note_id: note.id.clone(),
            content: note.content.clone(),
        });
        true
    }

    pub fn set_edit_draft(&mut self, content: impl Into<String>) {
        if let Some(draft) = self.editing.as_mut() {
            draft.content = content.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// A blank draft is ignored and the note stays open for editing. The draft
    /// is kept until the owner confirms with `mark_saved`.
    pub fn save_edit(&self) -> Option<OwnerEvent> {
        if !self.can_post() {
            return None;
        }
        let draft = self.editing.as_ref()?;
        if draft.content.trim().is_empty() {
            return None;
        }
        Some(OwnerEvent::EditNote {
            id: draft.note_id.clone(),
            content: draft.content.clone(),
        })
    }

    pub fn mark_saved(&mut self) {
        self.editing = None;
    }

    /// Asks `confirm` before anything is emitted.
    pub fn delete<F>(&self, id: &str, confirm: F) -> Option<OwnerEvent>
    where
        F: FnOnce(&str) -> bool,
    {
        if !self.can_post() {
            return None;
        }
        if !confirm(DELETE_CONFIRMATION) {
            return None;
        }
        Some(OwnerEvent::DeleteNote { id: id.to_string() })
    }

    pub fn view(&self) -> NotesBoardView {
        NotesBoardView {
            notes: self.notes.clone(),
            editing: self.editing.clone(),
            can_post: self.can_post(),
        }
    }
}
