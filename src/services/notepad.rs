use serde::Serialize;

use crate::genai::TextGenerator;
use crate::models::Role;
use crate::services::OwnerEvent;

/// A generation that has been started but not yet applied to the note.
#[derive(Debug)]
pub struct PendingGeneration {
    prompt: String,
}

impl PendingGeneration {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotepadView {
    pub content: String,
    pub prompt_draft: String,
    pub assist_panel_visible: bool,
    pub is_generating: bool,
    pub read_only: bool,
}

/// Working copy of a personal notepad with the AI assist panel.
#[derive(Debug)]
pub struct NotepadController {
    role: Role,
    canonical: String,
    content: String,
    prompt_draft: String,
    assist_panel_visible: bool,
    is_generating: bool,
}

impl NotepadController {
    pub fn new(role: Role, initial: impl Into<String>) -> Self {
        let initial = initial.into();
        Self {
            role,
            content: initial.clone(),
            canonical: initial,
            prompt_draft: String::new(),
            assist_panel_visible: false,
            is_generating: false,
        }
    }

    pub fn is_read_only(&self) -> bool {
        !self.role.can_use_notepad()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn prompt_draft(&self) -> &str {
        &self.prompt_draft
    }

    pub fn is_assist_panel_visible(&self) -> bool {
        self.assist_panel_visible
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    /// Picks up a new canonical value. Returns true when the working copy was reset.
    pub fn sync_from_owner(&mut self, canonical: &str) -> bool {
        if self.canonical == canonical {
            return false;
        }
        self.discard_and_reload(canonical);
        true
    }

    /// Last writer wins: unsaved edits are dropped in favour of the owner's value.
    pub fn discard_and_reload(&mut self, canonical: &str) {
        self.canonical = canonical.to_string();
        self.content = canonical.to_string();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        if self.is_read_only() {
            return;
        }
        self.content = content.into();
    }

    pub fn set_prompt_draft(&mut self, prompt: impl Into<String>) {
        if self.is_read_only() {
            return;
        }
        self.prompt_draft = prompt.into();
    }

    pub fn toggle_assist_panel(&mut self) {
        if self.is_read_only() {
            return;
        }
        self.assist_panel_visible = !self.assist_panel_visible;
    }

    /// Claims the single generation slot for the current prompt draft.
    pub fn begin_generation(&mut self) -> Option<PendingGeneration> {
        if self.is_read_only() || self.is_generating || self.prompt_draft.trim().is_empty() {
            return None;
        }
        self.is_generating = true;
        Some(PendingGeneration {
            prompt: self.prompt_draft.clone(),
        })
    }

    pub fn complete_generation(&mut self, pending: PendingGeneration, result: &str) {
        self.content.push_str(&format!(
            "\n\n--- AI Generated Content for \"{}\" ---\n{}\n--- End AI Content ---",
            pending.prompt, result
        ));
        self.prompt_draft.clear();
        self.assist_panel_visible = false;
        self.is_generating = false;
    }

    /// Runs a whole generation round for callers that own the controller exclusively.
    pub async fn request_generation(&mut self, generator: &dyn TextGenerator) -> bool {
        let Some(pending) = self.begin_generation() else {
            return false;
        };
        let result = generator.generate(pending.prompt()).await;
        self.complete_generation(pending, &result);
        true
    }

    pub fn save(&self) -> Option<OwnerEvent> {
        if self.is_read_only() {
            return None;
        }
        Some(OwnerEvent::SaveNotepad {
            content: self.content.clone(),
        })
    }

    pub fn view(&self) -> NotepadView {
        NotepadView {
            content: self.content.clone(),
            prompt_draft: self.prompt_draft.clone(),
            assist_panel_visible: self.assist_panel_visible,
            is_generating: self.is_generating,
            read_only: self.is_read_only(),
        }
    }
}
