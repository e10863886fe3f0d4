use tracing::{info, warn};
use uuid::Uuid;

use crate::db::repository;
use crate::error::AppError;
use crate::services::{DashboardSession, OwnerEvent};
use crate::state::AppState;

/// Pulls the canonical data into the session's working copies. Components
/// whose canonical value changed drop their unsaved edits.
pub async fn refresh(state: &AppState, session: &mut DashboardSession) -> Result<(), AppError> {
    match repository::fetch_class_routine(&state.db, session.selected_class()).await? {
        Some(routine) => {
            if session.routine_editor.sync_from_owner(&routine) {
                info!(
                    "routine editor for {} loaded class {} (revision {})",
                    session.user.username, routine.class_name, routine.revision
                );
            }
        }
        None => session.routine_editor.clear(),
    }

    let notes = repository::fetch_notes(&state.db).await?;
    session.notes_board.sync_from_owner(notes);

    if session.user.role.can_use_notepad() {
        let content = repository::fetch_notepad(&state.db, &session.user.username).await?;
        session.notepad.sync_from_owner(&content);
    }

    Ok(())
}

/// Carries out a controller's request against the canonical store.
pub async fn apply(
    state: &AppState,
    session_id: &Uuid,
    session: &DashboardSession,
    event: OwnerEvent,
) -> Result<(), AppError> {
    let user = &session.user;
    match event {
        OwnerEvent::UpdateRoutine { class_name, routine } => {
            let saved = repository::save_routine(&state.db, &class_name, &routine).await?;
            info!(
                "{} saved routine for class {} (revision {})",
                user.username, class_name, saved.revision
            );
        }
        OwnerEvent::AddNote { content } => {
            let note = repository::insert_note(&state.db, &content, &user.name).await?;
            info!("{} posted note {}", user.username, note.id);
        }
        OwnerEvent::EditNote { id, content } => {
            if !repository::update_note(&state.db, &id, &content).await? {
                warn!("note {} vanished before it could be edited", id);
                return Err(AppError::NotFound);
            }
            info!("{} edited note {}", user.username, id);
        }
        OwnerEvent::DeleteNote { id } => {
            if !repository::delete_note(&state.db, &id).await? {
                return Err(AppError::NotFound);
            }
            info!("{} deleted note {}", user.username, id);
        }
        OwnerEvent::SaveNotepad { content } => {
            repository::save_notepad(&state.db, &user.username, &content).await?;
            info!("{} saved notepad ({} bytes)", user.username, content.len());
        }
        OwnerEvent::Logout => {
            state.sessions.remove(session_id).await;
            info!("{} logged out", user.username);
        }
    }
    Ok(())
}
