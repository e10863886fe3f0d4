use axum::Json;
use axum::extract::{Path, Query};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::routing::{delete, post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    EditNoteRequest, EntryField, FullSchoolRoutine, NewNoteRequest, Role, SchoolDay, User,
};
use crate::services::{
    DashboardSession, NotepadView, NotesBoardView, RoutineGrid, SharedSession, Tab, owner,
};
use crate::state::AppState;

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
    role: Role,
}

#[derive(Serialize)]
struct LoginResponse {
    session_id: Uuid,
    user: User,
}

#[derive(Serialize)]
struct DashboardView {
    user: User,
    tabs: Vec<Tab>,
    active_tab: Tab,
    classes: Vec<String>,
    selected_class: String,
    can_select_class: bool,
    routine: RoutineGrid,
    notes: NotesBoardView,
    #[serde(skip_serializing_if = "Option::is_none")]
    notepad: Option<NotepadView>,
}

#[derive(Deserialize)]
struct TabRequest {
    tab: Tab,
}

#[derive(Deserialize)]
struct SelectClassRequest {
    class_name: String,
}

#[derive(Deserialize)]
struct CellUpdateRequest {
    day: SchoolDay,
    period_index: usize,
    field: EntryField,
    value: String,
}

#[derive(Deserialize)]
struct PeriodLabelRequest {
    period_index: usize,
    value: String,
}

#[derive(Deserialize)]
struct DeleteNoteParams {
    #[serde(default)]
    confirm: bool,
}

#[derive(Deserialize)]
struct NotepadContentRequest {
    content: String,
}

#[derive(Deserialize)]
struct PromptRequest {
    prompt: String,
}

#[derive(Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    prompt: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/tab", put(set_tab))
        .route("/dashboard/class", put(select_class))
        .route("/dashboard/routine", get(routine))
        .route("/dashboard/routines", get(school_routine))
        .route("/dashboard/routine/cell", put(update_cell))
        .route("/dashboard/routine/period", put(update_period_label))
        .route("/dashboard/routine/save", post(save_routine))
        .route("/dashboard/notes", get(notes).post(add_note))
        .route("/dashboard/note-edit", put(update_edit_draft))
        .route("/dashboard/note-edit/save", post(save_note_edit))
        .route("/dashboard/note-edit/cancel", post(cancel_note_edit))
        .route("/dashboard/notes/{id}/edit", post(start_note_edit))
        .route("/dashboard/notes/{id}", delete(delete_note))
        .route("/dashboard/notepad", get(notepad).put(update_notepad))
        .route("/dashboard/notepad/prompt", put(update_prompt))
        .route("/dashboard/notepad/assist", post(toggle_assist))
        .route("/dashboard/notepad/generate", post(generate))
        .route("/dashboard/notepad/save", post(save_notepad))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

fn session_id(headers: &HeaderMap) -> Result<Uuid, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| AppError::Unauthorized("missing or malformed session".to_string()))
}

async fn open_session(state: &AppState, headers: &HeaderMap) -> Result<(Uuid, SharedSession), AppError> {
    let id = session_id(headers)?;
    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::Unauthorized("session expired".to_string()))?;
    Ok((id, session))
}

async fn dashboard_view(state: &AppState, session: &DashboardSession) -> Result<DashboardView, AppError> {
    Ok(DashboardView {
        user: session.user.clone(),
        tabs: session.available_tabs(),
        active_tab: session.active_tab(),
        classes: repository::list_classes(&state.db).await?,
        selected_class: session.selected_class().to_string(),
        can_select_class: session.user.role.can_select_class(),
        routine: session.routine_editor.grid(),
        notes: session.notes_board.view(),
        notepad: session
            .user
            .role
            .can_use_notepad()
            .then(|| session.notepad.view()),
    })
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .auth
        .login(&state.db, &req.username, &req.password, req.role)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials or role".to_string()))?;

    let classes = repository::list_classes(&state.db).await?;
    let notepad = repository::fetch_notepad(&state.db, &user.username).await?;
    let mut session = DashboardSession::new(user.clone(), &classes, &notepad);
    owner::refresh(&state, &mut session).await?;

    let session_id = state.sessions.insert(session).await;
    Ok(Json(LoginResponse { session_id, user }))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode, AppError> {
    let (id, shared) = open_session(&state, &headers).await?;
    let session = shared.lock().await;
    owner::apply(&state, &id, &session, session.logout()).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardView>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;
    Ok(Json(dashboard_view(&state, &session).await?))
}

async fn set_tab(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TabRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;
    session.set_tab(req.tab);
    Ok(Json(dashboard_view(&state, &session).await?))
}

async fn select_class(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SelectClassRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;

    if session.user.role.can_select_class() {
        if !repository::class_exists(&state.db, &req.class_name).await? {
            return Err(AppError::NotFound);
        }
        session.select_class(&req.class_name);
    }

    owner::refresh(&state, &mut session).await?;
    Ok(Json(dashboard_view(&state, &session).await?))
}

async fn routine(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RoutineGrid>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;
    Ok(Json(session.routine_editor.grid()))
}

/// Staff see every class; a student only their own.
async fn school_routine(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<FullSchoolRoutine>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let session = shared.lock().await;

    let mut routine = repository::fetch_full_routine(&state.db).await?;
    if !session.user.role.can_select_class() {
        routine.retain(|class_name, _| class_name == session.selected_class());
    }
    Ok(Json(routine))
}

async fn update_cell(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CellUpdateRequest>,
) -> Result<Json<RoutineGrid>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;
    session
        .routine_editor
        .set_field(req.day, req.period_index, req.field, &req.value);
    Ok(Json(session.routine_editor.grid()))
}

async fn update_period_label(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PeriodLabelRequest>,
) -> Result<Json<RoutineGrid>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;
    session
        .routine_editor
        .set_period_label(req.period_index, &req.value);
    Ok(Json(session.routine_editor.grid()))
}

async fn save_routine(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RoutineGrid>, AppError> {
    let (id, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;

    if let Some(event) = session.routine_editor.save() {
        owner::apply(&state, &id, &session, event).await?;
        session.routine_editor.mark_saved();
        owner::refresh(&state, &mut session).await?;
    }
    Ok(Json(session.routine_editor.grid()))
}

async fn notes(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<NotesBoardView>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;
    Ok(Json(session.notes_board.view()))
}

async fn add_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewNoteRequest>,
) -> Result<Json<NotesBoardView>, AppError> {
    let (id, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;

    if let Some(event) = session.notes_board.add(&req.content) {
        owner::apply(&state, &id, &session, event).await?;
    }
    owner::refresh(&state, &mut session).await?;
    Ok(Json(session.notes_board.view()))
}

async fn start_note_edit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(note_id): Path<String>,
) -> Result<Json<NotesBoardView>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;

    if session.notes_board.can_post() && !session.notes_board.start_edit(&note_id) {
        return Err(AppError::NotFound);
    }
    Ok(Json(session.notes_board.view()))
}

async fn update_edit_draft(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<EditNoteRequest>,
) -> Result<Json<NotesBoardView>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;
    session.notes_board.set_edit_draft(req.content);
    Ok(Json(session.notes_board.view()))
}

async fn save_note_edit(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<NotesBoardView>, AppError> {
    let (id, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;

    if let Some(event) = session.notes_board.save_edit() {
        owner::apply(&state, &id, &session, event).await?;
        session.notes_board.mark_saved();
    }
    owner::refresh(&state, &mut session).await?;
    Ok(Json(session.notes_board.view()))
}

async fn cancel_note_edit(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<NotesBoardView>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    session.notes_board.cancel_edit();
    owner::refresh(&state, &mut session).await?;
    Ok(Json(session.notes_board.view()))
}

async fn delete_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(note_id): Path<String>,
    Query(params): Query<DeleteNoteParams>,
) -> Result<Json<NotesBoardView>, AppError> {
    let (id, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;

    if let Some(event) = session.notes_board.delete(&note_id, |_| params.confirm) {
        owner::apply(&state, &id, &session, event).await?;
    }
    owner::refresh(&state, &mut session).await?;
    Ok(Json(session.notes_board.view()))
}

async fn notepad(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<NotepadView>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;
    Ok(Json(session.notepad.view()))
}

async fn update_notepad(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NotepadContentRequest>,
) -> Result<Json<NotepadView>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;
    session.notepad.set_content(req.content);
    Ok(Json(session.notepad.view()))
}

async fn update_prompt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PromptRequest>,
) -> Result<Json<NotepadView>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;
    session.notepad.set_prompt_draft(req.prompt);
    Ok(Json(session.notepad.view()))
}

async fn toggle_assist(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<NotepadView>, AppError> {
    let (_, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;
    owner::refresh(&state, &mut session).await?;
    session.notepad.toggle_assist_panel();
    Ok(Json(session.notepad.view()))
}

/// The session lock is released while the service is working so the rest of
/// the dashboard stays usable. A second request meanwhile is a no-op.
///
/// The round runs on its own task, so the result still lands in the notepad
/// when the client goes away before it finishes.
async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<NotepadView>, AppError> {
    let (id, shared) = open_session(&state, &headers).await?;

    let pending = {
        let mut session = shared.lock().await;
        owner::refresh(&state, &mut session).await?;
        if let Some(prompt) = req.prompt {
            if !session.notepad.is_generating() {
                session.notepad.set_prompt_draft(prompt);
            }
        }
        match session.notepad.begin_generation() {
            Some(pending) => pending,
            None => return Ok(Json(session.notepad.view())),
        }
    };

    let round = {
        let state = state.clone();
        tokio::spawn(async move {
            let result = state.generator.generate(pending.prompt()).await;

            if !state.sessions.contains(&id).await {
                info!("session ended before generation finished; result discarded");
                return None;
            }

            let mut session = shared.lock().await;
            session.notepad.complete_generation(pending, &result);
            Some(session.notepad.view())
        })
    };

    match round.await {
        Ok(Some(view)) => Ok(Json(view)),
        Ok(None) => Err(AppError::Unauthorized("session expired".to_string())),
        Err(e) => {
            error!("generation task failed: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

async fn save_notepad(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<NotepadView>, AppError> {
    let (id, shared) = open_session(&state, &headers).await?;
    let mut session = shared.lock().await;

    if let Some(event) = session.notepad.save() {
        owner::apply(&state, &id, &session, event).await?;
    }
    owner::refresh(&state, &mut session).await?;
    Ok(Json(session.notepad.view()))
}
