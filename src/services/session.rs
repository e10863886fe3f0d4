use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::User;
use crate::services::{NotepadController, NotesBoard, OwnerEvent, RoutineEditor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Dashboard,
    Notepad,
}

/// Everything one signed-in user sees: the selected class, the tab and the
/// working copies held by each component.
#[derive(Debug)]
pub struct DashboardSession {
    pub user: User,
    active_tab: Tab,
    selected_class: String,
    pub routine_editor: RoutineEditor,
    pub notes_board: NotesBoard,
    pub notepad: NotepadController,
}

impl DashboardSession {
    pub fn new(user: User, classes: &[String], notepad_content: &str) -> Self {
        let selected_class = if user.role.can_select_class() {
            classes.first().cloned().unwrap_or_default()
        } else {
            user.username.clone()
        };

        Self {
            active_tab: Tab::Dashboard,
            selected_class,
            routine_editor: RoutineEditor::new(user.role),
            notes_board: NotesBoard::new(user.role),
            notepad: NotepadController::new(user.role, notepad_content),
            user,
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn selected_class(&self) -> &str {
        &self.selected_class
    }

    pub fn available_tabs(&self) -> Vec<Tab> {
        if self.user.role.can_use_notepad() {
            vec![Tab::Dashboard, Tab::Notepad]
        } else {
            vec![Tab::Dashboard]
        }
    }

    pub fn set_tab(&mut self, tab: Tab) -> bool {
        if !self.available_tabs().contains(&tab) {
            return false;
        }
        self.active_tab = tab;
        true
    }

    /// The routine editor follows on the next sync with the owner.
    pub fn select_class(&mut self, class_name: &str) -> bool {
        if !self.user.role.can_select_class() {
            return false;
        }
        self.selected_class = class_name.to_string();
        true
    }

    pub fn logout(&self) -> OwnerEvent {
        OwnerEvent::Logout
    }
}

pub type SharedSession = Arc<Mutex<DashboardSession>>;

struct StoredSession {
    session: SharedSession,
    last_seen: Instant,
}

/// Sessions by id. Every lookup counts as activity for `purge_idle`.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
}

impl SessionStore {
    pub async fn insert(&self, session: DashboardSession) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.insert(
            id,
            StoredSession {
                session: Arc::new(Mutex::new(session)),
                last_seen: Instant::now(),
            },
        );
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        let mut sessions = self.inner.write().await;
        let stored = sessions.get_mut(id)?;
        stored.last_seen = Instant::now();
        Some(stored.session.clone())
    }

    pub async fn contains(&self, id: &Uuid) -> bool {
        self.inner.read().await.contains_key(id)
    }

    pub async fn remove(&self, id: &Uuid) -> Option<SharedSession> {
        self.inner.write().await.remove(id).map(|stored| stored.session)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Drops sessions not looked up for at least `max_idle`. Returns how many went.
    pub async fn purge_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, stored| stored.last_seen.elapsed() < max_idle);
        before - sessions.len()
    }
}
