use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::Authenticator;
use crate::genai::TextGenerator;
use crate::services::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub generator: Arc<dyn TextGenerator>,
    pub auth: Arc<Authenticator>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(db: SqlitePool, generator: Arc<dyn TextGenerator>, auth: Authenticator) -> Self {
        Self {
            db,
            generator,
            auth: Arc::new(auth),
            sessions: SessionStore::default(),
        }
    }
}
