pub mod notepad;
pub mod notes_board;
pub mod owner;
pub mod routine_editor;
pub mod session;
pub mod session_sweeper;

pub use notepad::{NotepadController, NotepadView, PendingGeneration};
pub use notes_board::{EditDraft, NotesBoard, NotesBoardView, DELETE_CONFIRMATION};
pub use routine_editor::{GridCell, GridRow, RoutineEditor, RoutineGrid, MISSING_CELL};
pub use session::{DashboardSession, SessionStore, SharedSession, Tab};
pub use session_sweeper::{SWEEP_INTERVAL, SessionSweeper};

use crate::models::WeeklySchedule;

/// Requests a controller hands to the owner of the canonical data.
/// Controllers never wait for the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerEvent {
    UpdateRoutine {
        class_name: String,
        routine: WeeklySchedule,
    },
    AddNote {
        content: String,
    },
    EditNote {
        id: String,
        content: String,
    },
    DeleteNote {
        id: String,
    },
    SaveNotepad {
        content: String,
    },
    Logout,
}
